//! refy-core: Core library for the Refy client
//!
//! Everything the desktop client needs between the UI and the backend,
//! without the UI itself and without the HTTP transport.
//!
//! # Main Entry Points
//!
//! - [`refresh`] - The single polling loop shared by every screen
//! - [`relationships`] - Attach/detach logic between links, collections and teams
//! - [`screens`] - Screen controllers built on the two above
//! - [`session`] - Signed-in user and owned-item cache
//! - [`requests`] - Requester traits and connectivity status
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod items;
pub mod logging;
pub mod refresh;
pub mod relationships;
pub mod requests;
pub mod screens;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use config::RefyConfig;
pub use errors::{ConfigError, RefyError, RefyResult};
pub use items::{
    Collection, CustomLink, ExpiredTime, Item, ItemId, Link, Team, TeamMember, TeamRole,
    ValidationError,
};
pub use refresh::{ActivationOutcome, RefreshContext, RefreshController, RefreshState, Routine};
pub use relationships::AttachmentRequest;
pub use requests::{ConnectionStatus, RequestError, RequestResult, Requester, StatusSnapshot};
pub use screens::{ScreenError, ScreenServices};
pub use session::{Credentials, SessionCache, SessionError};

// Re-export logging initialization
pub use logging::init_logging;
