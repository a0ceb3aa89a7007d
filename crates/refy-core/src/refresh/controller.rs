use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::refresh::guard::{GuardDecision, RecompositionGuard};
use crate::refresh::types::{
    ActivationOutcome, Publish, RefreshContext, RefreshState, Routine, StartOutcome, routine,
};
use crate::requests::{ConnectionStatus, RequestResult};

/// Owns the single refresh loop of the client.
///
/// Constructed once by the application and handed to every screen. Cloning
/// is cheap and every clone drives the same loop.
///
/// # Guarantees
///
/// - At most one context owns the loop; activating another one stops the
///   previous loop first.
/// - Cycles of one context never overlap: a tick that lands while the
///   previous routine is still in flight is skipped, not queued.
/// - Results of a cycle that finishes after `stop`/`suspend` (or after a
///   restart) are discarded.
///
/// All methods must be called from within a tokio runtime to actually drive
/// cycles; outside of one, `start` reports [`StartOutcome::NoRuntime`].
#[derive(Clone)]
pub struct RefreshController {
    shared: Arc<Shared>,
}

struct Shared {
    interval: Duration,
    status: ConnectionStatus,
    inner: Mutex<LoopState>,
}

struct LoopState {
    context: Option<RefreshContext>,
    state: RefreshState,
    guard: RecompositionGuard,
    /// Bumped whenever the armed timer changes; stale timers and results
    /// compare against it.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    routine: Option<Routine>,
    repeat: bool,
    in_flight: HashSet<RefreshContext>,
    cycles_started: u64,
    cycles_skipped: u64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RefreshController {
    pub fn new(config: &RefreshConfig, status: ConnectionStatus) -> Self {
        Self::with_interval(config.interval(), config.guard_threshold, status)
    }

    /// A zero interval is clamped to one millisecond.
    pub fn with_interval(
        interval: Duration,
        guard_threshold: u32,
        status: ConnectionStatus,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                interval: interval.max(Duration::from_millis(1)),
                status,
                inner: Mutex::new(LoopState {
                    context: None,
                    state: RefreshState::Stopped,
                    guard: RecompositionGuard::new(guard_threshold),
                    generation: 0,
                    timer: None,
                    routine: None,
                    repeat: false,
                    in_flight: HashSet::new(),
                    cycles_started: 0,
                    cycles_skipped: 0,
                }),
            }),
        }
    }

    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.shared.status
    }

    pub fn state(&self) -> RefreshState {
        self.shared.lock().state
    }

    /// State of the loop as seen from `context`: anything but the owner is stopped.
    pub fn state_of(&self, context: &RefreshContext) -> RefreshState {
        let state = self.shared.lock();
        if state.context.as_ref() == Some(context) {
            state.state
        } else {
            RefreshState::Stopped
        }
    }

    pub fn context(&self) -> Option<RefreshContext> {
        self.shared.lock().context.clone()
    }

    pub fn guard_count(&self) -> u32 {
        self.shared.lock().guard.count()
    }

    pub fn cycles_started(&self) -> u64 {
        self.shared.lock().cycles_started
    }

    pub fn cycles_skipped(&self) -> u64 {
        self.shared.lock().cycles_skipped
    }

    /// Make `context` the owner of the loop.
    ///
    /// Re-activating the context that already runs goes through the
    /// recomposition guard; once the guard lets a call through, the current
    /// routine is restarted.
    pub fn activate(&self, context: RefreshContext) -> ActivationOutcome {
        let mut state = self.shared.lock();
        let outcome = Self::register(&mut state, context);
        match &outcome {
            ActivationOutcome::Restarted | ActivationOutcome::Activated
                if state.routine.is_some() =>
            {
                self.arm(&mut state, Duration::ZERO);
            }
            _ => {}
        }
        outcome
    }

    /// Install `routine` for the active context and run it now, then every
    /// interval when `repeat` is set.
    pub fn start(&self, routine: Routine, repeat: bool) -> StartOutcome {
        let mut state = self.shared.lock();
        self.start_locked(&mut state, routine, repeat)
    }

    /// Screen entry point: activate `context` and, unless the guard absorbed
    /// the call, start polling with `routine`.
    pub fn refresh(&self, context: RefreshContext, routine: Routine) -> ActivationOutcome {
        let mut state = self.shared.lock();
        let outcome = Self::register(&mut state, context);
        if outcome.permits_start() {
            self.start_locked(&mut state, routine, true);
        }
        outcome
    }

    /// Pause the loop, typically while a dialog is open.
    pub fn suspend(&self) {
        let mut state = self.shared.lock();
        if state.state != RefreshState::Running {
            return;
        }
        state.state = RefreshState::Suspended;
        Self::disarm(&mut state);
        debug!(
            event = "core.refresh.suspended",
            context = ?state.context.as_ref().map(RefreshContext::as_str)
        );
    }

    /// Resume a suspended loop. The next cycle fires one interval from now.
    pub fn resume(&self) {
        let mut state = self.shared.lock();
        if state.state != RefreshState::Suspended {
            return;
        }
        state.state = RefreshState::Running;
        if state.routine.is_some() && state.repeat {
            self.arm(&mut state, self.shared.interval);
        }
        debug!(
            event = "core.refresh.resumed",
            context = ?state.context.as_ref().map(RefreshContext::as_str)
        );
    }

    /// Stop the loop from any state and drop the installed routine.
    pub fn stop(&self) {
        let mut state = self.shared.lock();
        Self::stop_locked(&mut state);
    }

    /// Run one request outside of the polling cadence.
    ///
    /// Not subject to the single-flight gate; the outcome is recorded in the
    /// shared [`ConnectionStatus`] and returned as-is.
    pub async fn fetch_once<T, Fut>(&self, request: Fut) -> RequestResult<T>
    where
        Fut: Future<Output = RequestResult<T>>,
    {
        let result = request.await;
        if let Err(e) = &result {
            debug!(event = "core.refresh.fetch_once_failed", error = %e);
        }
        self.shared.status.record(&result);
        result
    }

    /// Build a polling routine from a request and a publish step.
    ///
    /// The request runs every cycle; its outcome updates the connection
    /// status and a successful value is handed to `publish`, both only when
    /// the loop is still live at completion.
    pub fn fetch_routine<T, F, Fut, P>(&self, request: F, publish: P) -> Routine
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RequestResult<T>> + Send + 'static,
        P: Fn(T) + Send + Sync + 'static,
    {
        let status = self.shared.status.clone();
        let publish = Arc::new(publish);
        routine(move || {
            let status = status.clone();
            let publish = Arc::clone(&publish);
            let pending = request();
            async move {
                let result = pending.await;
                let deliver: Publish = Box::new(move || {
                    status.record(&result);
                    if let Ok(value) = result {
                        publish(value);
                    }
                });
                deliver
            }
        })
    }

    fn register(state: &mut LoopState, context: RefreshContext) -> ActivationOutcome {
        if state.context.as_ref() == Some(&context) {
            if state.state == RefreshState::Running {
                return match state.guard.check() {
                    GuardDecision::Absorb { count } => {
                        debug!(
                            event = "core.refresh.activation_guarded",
                            context = %context,
                            count = count
                        );
                        ActivationOutcome::Guarded { count }
                    }
                    GuardDecision::Allow => {
                        info!(event = "core.refresh.restarted", context = %context);
                        ActivationOutcome::Restarted
                    }
                };
            }

            state.state = RefreshState::Running;
            state.guard.reset();
            info!(event = "core.refresh.activated", context = %context);
            return ActivationOutcome::Activated;
        }

        let previous = state.context.replace(context.clone());
        if previous.is_some() {
            Self::disarm(state);
        }
        state.routine = None;
        state.guard.reset();
        state.state = RefreshState::Running;

        match previous {
            Some(previous) => {
                info!(
                    event = "core.refresh.context_switched",
                    previous = %previous,
                    context = %context
                );
                ActivationOutcome::Switched { previous }
            }
            None => {
                info!(event = "core.refresh.activated", context = %context);
                ActivationOutcome::Activated
            }
        }
    }

    fn start_locked(&self, state: &mut LoopState, routine: Routine, repeat: bool) -> StartOutcome {
        let Some(context) = state.context.clone() else {
            warn!(
                event = "core.refresh.start_without_context",
                "Refresh loop started before any screen was activated"
            );
            return StartOutcome::NoContext;
        };

        if Handle::try_current().is_err() {
            warn!(event = "core.refresh.no_runtime", context = %context);
            return StartOutcome::NoRuntime;
        }

        state.routine = Some(routine);
        state.repeat = repeat;
        state.state = RefreshState::Running;
        self.arm(state, Duration::ZERO);

        debug!(
            event = "core.refresh.started",
            context = %context,
            repeat = repeat
        );
        StartOutcome::Started
    }

    fn stop_locked(state: &mut LoopState) {
        Self::disarm(state);
        state.state = RefreshState::Stopped;
        state.routine = None;
        state.guard.reset();
        info!(
            event = "core.refresh.stopped",
            context = ?state.context.as_ref().map(RefreshContext::as_str)
        );
    }

    /// Cancel the pending timer and invalidate in-flight results.
    fn disarm(state: &mut LoopState) {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
    }

    fn arm(&self, state: &mut LoopState, initial_delay: Duration) {
        Self::disarm(state);

        let Some(routine) = state.routine.clone() else {
            return;
        };
        let Ok(handle) = Handle::try_current() else {
            warn!(event = "core.refresh.no_runtime");
            return;
        };

        let generation = state.generation;
        let repeat = state.repeat;
        let interval = self.shared.interval;
        let first_tick = Instant::now() + initial_delay;
        let shared = Arc::clone(&self.shared);

        state.timer = Some(handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                fire_cycle(&shared, generation, &routine);
                if !repeat {
                    break;
                }
            }
        }));
    }
}

fn fire_cycle(shared: &Arc<Shared>, generation: u64, routine: &Routine) {
    let context = {
        let mut state = shared.lock();
        if state.generation != generation || state.state != RefreshState::Running {
            return;
        }
        let Some(context) = state.context.clone() else {
            return;
        };
        if !state.in_flight.insert(context.clone()) {
            state.cycles_skipped += 1;
            debug!(event = "core.refresh.cycle_skipped", context = %context);
            return;
        }
        state.cycles_started += 1;
        context
    };

    let pending = routine();
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let publish = pending.await;
        let mut state = shared.lock();
        state.in_flight.remove(&context);
        // Published under the lock: once `stop` or `suspend` returns, nothing lands.
        if state.generation == generation && state.state == RefreshState::Running {
            publish();
        } else {
            drop(state);
            debug!(event = "core.refresh.result_discarded", context = %context);
        }
    });
}

impl std::fmt::Debug for RefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("RefreshController")
            .field("interval", &self.shared.interval)
            .field("context", &state.context)
            .field("state", &state.state)
            .field("guard", &state.guard)
            .finish()
    }
}
