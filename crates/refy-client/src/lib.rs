//! refy-client: HTTP transport for the Refy client
//!
//! [`HttpRequester`] implements every requester trait of `refy-core` over the
//! Refy REST API, mapping transport failures, rejected sessions and failed
//! replies onto [`refy_core::requests::RequestError`].

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod errors;

pub use client::{ClientConfig, HttpRequester};
pub use errors::ClientError;
