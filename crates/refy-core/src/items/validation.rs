//! Form input validation
//!
//! Checks drafts before they are sent to the backend so the UI can flag the
//! offending field instead of waiting for a server-side rejection.

use crate::items::errors::ValidationError;
use crate::items::types::{CollectionDraft, CustomLinkDraft, LinkDraft, TeamDraft};

pub const TITLE_MAX_LENGTH: usize = 30;
pub const DESCRIPTION_MAX_LENGTH: usize = 1500;

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let length = title.trim().chars().count();
    if length == 0 || length > TITLE_MAX_LENGTH {
        return Err(ValidationError::InvalidTitle {
            max: TITLE_MAX_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    let length = description.trim().chars().count();
    if length == 0 || length > DESCRIPTION_MAX_LENGTH {
        return Err(ValidationError::InvalidDescription {
            max: DESCRIPTION_MAX_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_link_reference(reference: &str) -> Result<(), ValidationError> {
    let trimmed = reference.trim();
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));

    let valid = match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !host.is_empty() && !rest.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidLinkReference {
            value: reference.to_string(),
        });
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if !valid {
        return Err(ValidationError::InvalidColor {
            value: color.to_string(),
        });
    }
    Ok(())
}

impl LinkDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_link_reference(&self.reference_link)?;
        validate_description(&self.description)
    }
}

impl CollectionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        validate_color(&self.color)
    }
}

impl TeamDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

impl CustomLinkDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;

        if self.resources.keys().any(|k| k.trim().is_empty())
            || self.fields.keys().any(|k| k.trim().is_empty())
        {
            return Err(ValidationError::BlankKey);
        }

        if self.resources.is_empty() {
            return Err(ValidationError::MissingResources);
        }

        Ok(())
    }
}
