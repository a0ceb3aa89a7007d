//! # Configuration System
//!
//! TOML configuration for the Refy client.
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.refy/config.toml
//! [server]
//! host = "https://refy.example.com"
//!
//! [refresh]
//! interval_ms = 1000
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use refy_core::config::RefyConfig;
//!
//! fn example() -> Result<(), refy_core::errors::ConfigError> {
//!     let config = RefyConfig::load_hierarchy()?;
//!     let _interval = config.refresh.interval();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{RefreshConfig, RefyConfig, ServerConfig, SessionConfig};
pub use validation::validate_config;

impl RefyConfig {
    /// Load configuration from defaults and the user config file.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
