//! Session lifecycle events.
//!
//! Every path that starts or ends a session (fresh sign-in, restored session
//! file, sign-out, token rejected by the server) reports through here.

use tracing::{info, warn};

use crate::items::ItemId;

pub fn log_session_started(user_id: &ItemId, host: &str, restored: bool) {
    info!(
        event = "core.session.started",
        user_id = %user_id,
        host = %host,
        restored = restored,
        version = env!("CARGO_PKG_VERSION")
    );
}

pub fn log_session_ended() {
    info!(event = "core.session.ended");
}

/// The server refused the stored credentials.
pub fn log_session_lost(reason: &str) {
    warn!(event = "core.session.lost", reason = %reason);
}
