//! Session-wide connectivity flags.
//!
//! Every request outcome is recorded here so the UI can show the offline
//! banner, bounce the user back to sign-in, or pop a transient notice.

use std::sync::Arc;

use tokio::sync::watch;

use crate::events;
use crate::requests::errors::{RequestError, RequestResult};

/// What the UI needs to know about the backend right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Sticky until the next successful request.
    pub server_offline: bool,
    /// The session was rejected; the UI returns to the sign-in screen.
    pub disconnected: bool,
    /// Last generic failure message, until dismissed.
    pub notice: Option<String>,
}

/// Observable connectivity state shared by every screen.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    tx: Arc<watch::Sender<StatusSnapshot>>,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStatus {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    pub fn is_server_offline(&self) -> bool {
        self.tx.borrow().server_offline
    }

    pub fn is_disconnected(&self) -> bool {
        self.tx.borrow().disconnected
    }

    /// Apply a request outcome to the flags.
    pub fn record<T>(&self, result: &RequestResult<T>) {
        match result {
            Ok(_) => {
                self.tx.send_if_modified(|s| {
                    let was_offline = s.server_offline;
                    s.server_offline = false;
                    if was_offline {
                        tracing::info!(event = "core.status.server_back_online");
                    }
                    was_offline
                });
            }
            Err(error) => self.record_error(error),
        }
    }

    pub fn record_error(&self, error: &RequestError) {
        match error {
            RequestError::Connection { message } => {
                self.tx.send_if_modified(|s| {
                    let changed = !s.server_offline;
                    s.server_offline = true;
                    if changed {
                        tracing::warn!(event = "core.status.server_offline", error = %message);
                    }
                    changed
                });
            }
            RequestError::Session { message } => {
                self.tx.send_if_modified(|s| {
                    let changed = !s.disconnected;
                    s.disconnected = true;
                    if changed {
                        events::log_session_lost(message);
                    }
                    changed
                });
            }
            RequestError::Request { .. } | RequestError::Decode { .. } => {
                let message = error.to_string();
                tracing::info!(event = "core.status.notice_raised", message = %message);
                self.tx.send_modify(|s| s.notice = Some(message));
            }
        }
    }

    /// Called when the user closes the notice.
    pub fn dismiss_notice(&self) {
        self.tx.send_if_modified(|s| s.notice.take().is_some());
    }

    /// Forget a previous disconnection, after the user signed in again.
    pub fn reconnect(&self) {
        self.tx.send_if_modified(|s| std::mem::take(&mut s.disconnected));
    }
}
