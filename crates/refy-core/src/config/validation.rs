use crate::config::types::RefyConfig;
use crate::errors::ConfigError;

/// Validate a fully merged configuration.
pub fn validate_config(config: &RefyConfig) -> Result<(), ConfigError> {
    if let Some(host) = &config.server.host
        && !(host.starts_with("http://") || host.starts_with("https://"))
    {
        return Err(ConfigError::InvalidHost { host: host.clone() });
    }

    if config.server.timeout_secs == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "server.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.refresh.interval_ms == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "refresh.interval_ms must be greater than 0".to_string(),
        });
    }

    Ok(())
}
