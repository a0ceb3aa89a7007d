use crate::errors::RefyError;

/// Why a backend request did not succeed.
///
/// The first three variants drive distinct UI reactions: an offline banner,
/// a return to the sign-in screen, and a dismissible notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Server unreachable: {message}")]
    Connection { message: String },

    #[error("Session rejected by the server: {message}")]
    Session { message: String },

    #[error("{message}")]
    Request { message: String },

    #[error("Unexpected response from the server: {message}")]
    Decode { message: String },
}

impl RequestError {
    pub fn connection(message: impl Into<String>) -> Self {
        RequestError::Connection {
            message: message.into(),
        }
    }

    pub fn session(message: impl Into<String>) -> Self {
        RequestError::Session {
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        RequestError::Request {
            message: message.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, RequestError::Connection { .. })
    }

    pub fn is_session(&self) -> bool {
        matches!(self, RequestError::Session { .. })
    }
}

impl RefyError for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            RequestError::Connection { .. } => "REQUEST_CONNECTION_FAILED",
            RequestError::Session { .. } => "REQUEST_SESSION_INVALID",
            RequestError::Request { .. } => "REQUEST_FAILED",
            RequestError::Decode { .. } => "REQUEST_DECODE_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, RequestError::Request { .. })
    }
}

pub type RequestResult<T> = Result<T, RequestError>;
