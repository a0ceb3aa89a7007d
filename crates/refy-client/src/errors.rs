use refy_core::errors::RefyError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid host '{host}': must start with http:// or https://")]
    InvalidHost { host: String },

    #[error("Invalid session token: {message}")]
    InvalidToken { message: String },

    #[error("Failed to build HTTP client: {source}")]
    BuildFailed {
        #[from]
        source: reqwest::Error,
    },
}

impl RefyError for ClientError {
    fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidHost { .. } => "CLIENT_INVALID_HOST",
            ClientError::InvalidToken { .. } => "CLIENT_INVALID_TOKEN",
            ClientError::BuildFailed { .. } => "CLIENT_BUILD_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ClientError::InvalidHost { .. })
    }
}
