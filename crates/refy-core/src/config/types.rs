//! Configuration type definitions for the Refy client.
//!
//! These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! host = "https://refy.example.com"
//! timeout_secs = 15
//!
//! [refresh]
//! interval_ms = 2000
//! guard_threshold = 3
//!
//! [session]
//! file = "/home/me/.refy/session.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration loaded from `~/.refy/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefyConfig {
    /// Backend connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Polling loop settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Local session storage
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the Refy backend. Usually set at sign-in time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "super::defaults::default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Polling loop settings shared by every screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshConfig {
    /// Delay between two refresh cycles, in milliseconds.
    #[serde(default = "super::defaults::default_interval_ms")]
    pub interval_ms: u64,

    /// Number of redundant activations absorbed before a restart is let through.
    #[serde(default = "super::defaults::default_guard_threshold")]
    pub guard_threshold: u32,
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Local session storage.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// Override for the session file location (default: `~/.refy/session.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
