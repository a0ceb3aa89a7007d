//! Session file persistence
//!
//! The signed-in credentials live in a single JSON file, written through a
//! temp file and a rename.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SessionConfig;
use crate::session::errors::SessionError;
use crate::session::types::Credentials;

/// `[session] file` when configured, `~/.refy/session.json` otherwise.
pub fn session_file_path(config: &SessionConfig) -> Result<PathBuf, SessionError> {
    if let Some(file) = &config.file {
        return Ok(file.clone());
    }
    let home = dirs::home_dir().ok_or(SessionError::NoSessionPath)?;
    Ok(home.join(".refy").join("session.json"))
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.session.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after write error"
        );
    }
}

pub fn save_credentials(credentials: &Credentials, path: &Path) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(credentials).map_err(|e| {
        tracing::error!(
            event = "core.session.serialization_failed",
            error = %e,
            message = "Failed to serialize credentials to JSON"
        );
        SessionError::SerializationFailed {
            message: e.to_string(),
        }
    })?;

    let temp_file = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(SessionError::IoError { source: e });
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(SessionError::IoError { source: e });
    }

    tracing::debug!(event = "core.session.saved", file = %path.display());
    Ok(())
}

/// `Ok(None)` when no session was ever saved.
pub fn load_credentials(path: &Path) -> Result<Option<Credentials>, SessionError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SessionError::IoError { source: e }),
    };

    let credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
        tracing::warn!(
            event = "core.session.load_invalid_json",
            file = %path.display(),
            error = %e
        );
        SessionError::CorruptSessionFile {
            message: e.to_string(),
        }
    })?;

    credentials.validate()?;
    Ok(Some(credentials))
}

/// Remove the session file. A missing file is not an error.
pub fn remove_credentials(path: &Path) -> Result<(), SessionError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SessionError::IoError { source: e }),
    }
}
