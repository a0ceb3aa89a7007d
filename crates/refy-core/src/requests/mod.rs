//! The seam between the client and the backend.
//!
//! Screens never talk HTTP themselves: they hold one of the requester traits
//! and get back a [`RequestResult`], whose error side keeps connection loss,
//! session loss and ordinary failures apart.

pub mod errors;
pub mod status;
pub mod traits;

pub use errors::{RequestError, RequestResult};
pub use status::{ConnectionStatus, StatusSnapshot};
pub use traits::{CollectionRequests, CustomLinkRequests, LinkRequests, Requester, TeamRequests};
