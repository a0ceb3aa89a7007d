//! The shared refresh loop.
//!
//! Exactly one screen at a time owns the loop, identified by its
//! [`RefreshContext`]. The owner installs a [`Routine`] that fetches fresh
//! data and returns a deferred publish step; the controller runs it on a
//! fixed cadence, skips ticks while a cycle is still in flight and drops
//! results that arrive after the loop was stopped or suspended.

pub mod controller;
pub mod guard;
pub mod types;

pub use controller::RefreshController;
pub use guard::{GuardDecision, RecompositionGuard};
pub use types::{
    ActivationOutcome, Publish, RefreshContext, RefreshState, Routine, StartOutcome, routine,
};
