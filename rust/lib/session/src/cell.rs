use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::SessionState;

/// Callback type for session change notifications.
pub type ChangeHandler = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Unique handle for a subscription, returned by [`SessionCell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The single shared container holding session state.
///
/// - `get()` returns a snapshot.
/// - `set(state)` replaces the state and notifies every subscriber.
/// - `subscribe(handler)` / `unsubscribe(id)` manage observers.
pub struct SessionCell {
    state: RwLock<SessionState>,
    handlers: RwLock<Vec<(SubscriptionId, ChangeHandler)>>,
    next_id: AtomicU64,
}

impl SessionCell {
    pub fn new(initial: SessionState) -> Self {
        Self {
            state: RwLock::new(initial),
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn get(&self) -> SessionState {
        self.state.read().clone()
    }

    /// Read part of the state without cloning all of it.
    pub fn with<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.read())
    }

    /// Replace the state, then notify subscribers. Handlers run after the
    /// lock is released, so they may read the cell.
    pub(crate) fn set(&self, state: SessionState) {
        *self.state.write() = state.clone();
        let handlers: Vec<ChangeHandler> =
            self.handlers.read().iter().map(|(_, h)| h.clone()).collect();
        for handler in handlers {
            handler(&state);
        }
    }

    /// Apply `f` to the current state, then notify as in `set`.
    pub(crate) fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register a change handler, called synchronously on every change.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.handlers.write().retain(|(hid, _)| *hid != id);
    }
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new(SessionState::loading())
    }
}
