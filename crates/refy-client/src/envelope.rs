//! The `{"status": ..., "response": ...}` wrapper around every reply, and the
//! mapping of replies onto [`RequestError`].

use refy_core::requests::{RequestError, RequestResult};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Successful,
    Failed,
}

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: ResponseStatus,
    #[serde(default)]
    pub response: Value,
}

fn failure_message(response: &Value, status: StatusCode) -> String {
    match response {
        Value::String(message) if !message.trim().is_empty() => message.clone(),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with HTTP {status}")),
        _ => format!("Request failed with HTTP {status}"),
    }
}

/// Unwrap a reply into its `response` payload.
pub fn open(status: StatusCode, body: &str) -> RequestResult<Value> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RequestError::session(format!("HTTP {status}")));
    }

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(RequestError::request(format!(
                "Request failed with HTTP {status}"
            )));
        }
        Err(e) => {
            return Err(RequestError::Decode {
                message: e.to_string(),
            });
        }
    };

    if envelope.status == ResponseStatus::Failed || !status.is_success() {
        return Err(RequestError::request(failure_message(
            &envelope.response,
            status,
        )));
    }

    Ok(envelope.response)
}

/// Unwrap a reply and decode its payload as `T`.
pub fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> RequestResult<T> {
    let payload = open(status, body)?;
    serde_json::from_value(payload).map_err(|e| RequestError::Decode {
        message: e.to_string(),
    })
}

/// Unwrap a reply whose payload is irrelevant.
pub fn acknowledge(status: StatusCode, body: &str) -> RequestResult<()> {
    open(status, body).map(|_| ())
}
