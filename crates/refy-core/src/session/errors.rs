use crate::errors::RefyError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid credentials: {field}")]
    InvalidCredentials { field: String },

    #[error("Cannot locate the session file: home directory not found")]
    NoSessionPath,

    #[error("Failed to serialize session: {message}")]
    SerializationFailed { message: String },

    #[error("Session file is corrupt: {message}")]
    CorruptSessionFile { message: String },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl RefyError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotSignedIn => "SESSION_NOT_SIGNED_IN",
            SessionError::InvalidCredentials { .. } => "SESSION_INVALID_CREDENTIALS",
            SessionError::NoSessionPath => "SESSION_NO_PATH",
            SessionError::SerializationFailed { .. } => "SESSION_SERIALIZATION_FAILED",
            SessionError::CorruptSessionFile { .. } => "SESSION_FILE_CORRUPT",
            SessionError::IoError { .. } => "SESSION_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::NotSignedIn | SessionError::InvalidCredentials { .. }
        )
    }
}
