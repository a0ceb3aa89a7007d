//! Configuration loading and merging logic.
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.refy/config.toml`, or the file named by `REFY_CONFIG_FILE`

use crate::config::types::{RefreshConfig, RefyConfig, ServerConfig, SessionConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// Load configuration from defaults and the user config file.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// validation fails. A missing config file is not an error.
pub fn load_hierarchy() -> Result<RefyConfig, ConfigError> {
    let mut config = RefyConfig::default();

    match load_config_file(&user_config_path()) {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(ConfigError::ConfigNotFound { path }) => {
            tracing::debug!(event = "core.config.user_config_missing", path = %path);
        }
        Err(e) => return Err(e),
    }

    validate_config(&config)?;

    tracing::debug!(
        event = "core.config.loaded",
        host = ?config.server.host,
        interval_ms = config.refresh.interval_ms
    );

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<RefyConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are only replaced when the override sets them.
pub fn merge_configs(base: RefyConfig, override_config: RefyConfig) -> RefyConfig {
    RefyConfig {
        server: ServerConfig {
            host: override_config.server.host.or(base.server.host),
            timeout_secs: override_config.server.timeout_secs,
        },
        refresh: RefreshConfig {
            interval_ms: override_config.refresh.interval_ms,
            guard_threshold: override_config.refresh.guard_threshold,
        },
        session: SessionConfig {
            file: override_config.session.file.or(base.session.file),
        },
    }
}

fn user_config_path() -> PathBuf {
    if let Ok(path_str) = std::env::var("REFY_CONFIG_FILE")
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    match dirs::home_dir() {
        Some(home) => home.join(".refy").join("config.toml"),
        None => {
            tracing::warn!(
                event = "core.config.home_dir_not_found",
                fallback = ".",
                "Could not determine home directory - using current directory as fallback"
            );
            PathBuf::from(".").join(".refy").join("config.toml")
        }
    }
}
