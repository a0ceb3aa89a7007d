use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

/// Which screen owns the refresh loop. Compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefreshContext(Cow<'static, str>);

impl RefreshContext {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefreshContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Stopped,
    Running,
    /// Paused while a dialog is open; resumes without catching up.
    Suspended,
}

/// What an `activate` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The context became the owner of the loop.
    Activated,
    /// Another context owned the loop and was stopped first.
    Switched { previous: RefreshContext },
    /// Redundant activation absorbed by the recomposition guard.
    Guarded { count: u32 },
    /// The guard threshold was reached and the loop was restarted.
    Restarted,
}

impl ActivationOutcome {
    /// Whether the caller should (re)install its routine.
    pub fn permits_start(&self) -> bool {
        !matches!(self, ActivationOutcome::Guarded { .. })
    }
}

/// What a `start` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// No context was ever activated, so there is nobody to refresh for.
    NoContext,
    /// No tokio runtime is available to drive the timer.
    NoRuntime,
}

/// Deferred side effect of a cycle, run only if the loop is still live.
///
/// Runs while the controller state is locked, so it must not call back into
/// the [`RefreshController`](super::RefreshController).
pub type Publish = Box<dyn FnOnce() + Send>;

/// One fetch-and-publish step. Called once per cycle.
pub type Routine = Arc<dyn Fn() -> BoxFuture<'static, Publish> + Send + Sync>;

/// Wrap an async closure into a [`Routine`].
pub fn routine<F, Fut>(f: F) -> Routine
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Publish> + Send + 'static,
{
    Arc::new(move || f().boxed())
}
