//! Default values for configuration types.
//!
//! Functions here back the serde `#[serde(default = "...")]` attributes.

use crate::config::types::{RefreshConfig, ServerConfig};

/// Returns the default request timeout (10 seconds).
pub fn default_timeout_secs() -> u64 {
    10
}

/// Returns the default delay between refresh cycles (1000ms).
pub fn default_interval_ms() -> u64 {
    1000
}

/// Returns the default recomposition guard threshold (3).
///
/// The navigation layer re-invokes screen activation up to three times per
/// layout pass; the fourth call is the first one allowed to restart the loop.
pub fn default_guard_threshold() -> u32 {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            guard_threshold: default_guard_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_refresh_defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.guard_threshold, 3);
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert!(config.host.is_none());
        assert_eq!(config.timeout_secs, 10);
    }
}
