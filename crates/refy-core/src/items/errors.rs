use crate::errors::RefyError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title must be between 1 and {max} characters")]
    InvalidTitle { max: usize },

    #[error("Description must be between 1 and {max} characters")]
    InvalidDescription { max: usize },

    #[error("'{value}' is not a valid http(s) link")]
    InvalidLinkReference { value: String },

    #[error("'{value}' is not a valid #RRGGBB color")]
    InvalidColor { value: String },

    #[error("A custom link needs at least one resource with a non-empty key")]
    MissingResources,

    #[error("Resource and field keys cannot be blank")]
    BlankKey,
}

impl RefyError for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidTitle { .. } => "INVALID_TITLE",
            ValidationError::InvalidDescription { .. } => "INVALID_DESCRIPTION",
            ValidationError::InvalidLinkReference { .. } => "INVALID_LINK_REFERENCE",
            ValidationError::InvalidColor { .. } => "INVALID_COLOR",
            ValidationError::MissingResources => "MISSING_RESOURCES",
            ValidationError::BlankKey => "BLANK_KEY",
        }
    }

    fn is_user_error(&self) -> bool {
        true
    }
}
