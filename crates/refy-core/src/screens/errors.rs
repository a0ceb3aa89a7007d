use crate::errors::RefyError;
use crate::items::ValidationError;
use crate::requests::RequestError;

/// Failure of a user action triggered from a screen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScreenError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Only team admins can {action}")]
    NotPermitted { action: String },
}

impl RefyError for ScreenError {
    fn error_code(&self) -> &'static str {
        match self {
            ScreenError::Validation(e) => e.error_code(),
            ScreenError::Request(e) => e.error_code(),
            ScreenError::NotPermitted { .. } => "SCREEN_NOT_PERMITTED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            ScreenError::Validation(e) => e.is_user_error(),
            ScreenError::Request(e) => e.is_user_error(),
            ScreenError::NotPermitted { .. } => true,
        }
    }
}
