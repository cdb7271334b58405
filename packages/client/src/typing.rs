//! Typing indicator debouncer.
//!
//! Every keystroke raises the indicator (emitting `true` only when it was
//! idle) and reschedules a clear after the quiet window. Each keystroke bumps
//! a generation counter; a scheduled clear only emits `false` if no newer
//! keystroke happened since it was scheduled.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

/// Silence after the last keystroke before the indicator is lowered
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_secs(2);

type Emit = Arc<dyn Fn(bool) + Send + Sync>;

#[derive(Default)]
struct State {
    active: bool,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Turns raw keystrokes into at most one `true` per burst and exactly one
/// `false` once the quiet window passes or [`stop`](Self::stop) is called
pub struct TypingDebouncer {
    emit: Emit,
    quiet: Duration,
    state: Arc<Mutex<State>>,
}

impl TypingDebouncer {
    /// Debouncer with the default 2 second quiet window; `emit` receives
    /// each indicator change
    pub fn new(emit: impl Fn(bool) + Send + Sync + 'static) -> Self {
        Self::with_quiet_window(emit, DEFAULT_QUIET_WINDOW)
    }

    /// Debouncer with a custom quiet window
    pub fn with_quiet_window(emit: impl Fn(bool) + Send + Sync + 'static, quiet: Duration) -> Self {
        Self {
            emit: Arc::new(emit),
            quiet,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Register a keystroke. Must be called inside a tokio runtime.
    pub fn keystroke(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        let generation = state.generation;

        if !state.active {
            state.active = true;
            (self.emit)(true);
        }
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }

        let shared = Arc::clone(&self.state);
        let emit = Arc::clone(&self.emit);
        let quiet = self.quiet;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let mut state = lock(&shared);
            if state.generation == generation && state.active {
                state.active = false;
                state.pending = None;
                emit(false);
            }
        }));
    }

    /// Lower the indicator now (e.g. the message was sent)
    pub fn stop(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        if state.active {
            state.active = false;
            (self.emit)(false);
        }
    }

    /// Whether the indicator is currently raised
    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }
}

impl Drop for TypingDebouncer {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.abort();
        }
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
