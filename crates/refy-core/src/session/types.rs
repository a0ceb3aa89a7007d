use std::fmt;

use serde::{Deserialize, Serialize};

use crate::items::ItemId;
use crate::session::errors::SessionError;

/// Who is signed in, and where.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Base URL of the backend, e.g. `https://refy.example.com`.
    pub host: String,
    pub user_id: ItemId,
    pub token: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub tag_name: String,
}

impl Credentials {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Structural checks before the credentials are stored.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(SessionError::InvalidCredentials {
                field: format!("host '{}' must start with http:// or https://", self.host),
            });
        }
        if self.user_id.as_str().trim().is_empty() {
            return Err(SessionError::InvalidCredentials {
                field: "user id cannot be empty".to_string(),
            });
        }
        if self.token.trim().is_empty() {
            return Err(SessionError::InvalidCredentials {
                field: "token cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

// The token never ends up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .field("tag_name", &self.tag_name)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_credentials() -> Credentials {
    Credentials {
        host: "https://refy.example.com".to_string(),
        user_id: ItemId::new("user-1"),
        token: "secret-token".to_string(),
        name: "Ada".to_string(),
        surname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        tag_name: "@ada".to_string(),
    }
}
