//! Single-use reply callbacks and the waiter slot they resolve.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use gifbox_types::Values;
use tracing::debug;

use super::QUEUE_TARGET;

/// Result of executing a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    /// Whether the command succeeded.
    pub success: bool,
    /// Payload returned to the client.
    pub values: Values,
}

impl CommandOutcome {
    /// Successful outcome carrying `values`.
    #[must_use]
    pub const fn success(values: Values) -> Self {
        Self {
            success: true,
            values,
        }
    }

    /// Unsuccessful outcome with no payload.
    #[must_use]
    pub const fn failure() -> Self {
        Self {
            success: false,
            values: Vec::new(),
        }
    }
}

type Resolver = Box<dyn FnOnce(CommandOutcome) + Send>;

/// Resolves exactly one pending request.
///
/// The callback is consumed by [`ReplyCallback::resolve`]. Dropping it
/// unresolved reports a failure so the waiting request never depends on
/// its timeout alone.
pub struct ReplyCallback {
    resolver: Option<Resolver>,
}

impl ReplyCallback {
    /// Wraps a closure invoked with the command outcome.
    pub fn new(resolver: impl FnOnce(CommandOutcome) + Send + 'static) -> Self {
        Self {
            resolver: Some(Box::new(resolver)),
        }
    }

    /// A callback that discards the outcome.
    #[must_use]
    pub fn ignore() -> Self {
        Self { resolver: None }
    }

    /// Delivers the outcome.
    pub fn resolve(mut self, outcome: CommandOutcome) {
        if let Some(resolver) = self.resolver.take() {
            resolver(outcome);
        }
    }
}

impl Drop for ReplyCallback {
    fn drop(&mut self) {
        if let Some(resolver) = self.resolver.take() {
            resolver(CommandOutcome::failure());
        }
    }
}

impl fmt::Debug for ReplyCallback {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ReplyCallback")
            .field("pending", &self.resolver.is_some())
            .finish()
    }
}

#[derive(Debug)]
enum SlotState {
    Waiting,
    Ready(CommandOutcome),
    Abandoned,
}

/// Rendezvous between a blocked request and the consumer's callback.
///
/// The callback only holds this slot, never the connection, so a waiter
/// that gave up leaves nothing behind for a late callback to touch.
#[derive(Debug)]
pub(crate) struct ReplySlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl ReplySlot {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SlotState::Waiting),
            ready: Condvar::new(),
        })
    }

    /// Builds the callback that fills this slot.
    pub(crate) fn callback(self: &Arc<Self>) -> ReplyCallback {
        let slot = Arc::clone(self);
        ReplyCallback::new(move |outcome| slot.fill(outcome))
    }

    fn fill(&self, outcome: CommandOutcome) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            SlotState::Waiting => {
                *state = SlotState::Ready(outcome);
                self.ready.notify_all();
            }
            SlotState::Abandoned => {
                debug!(
                    target: QUEUE_TARGET,
                    success = outcome.success,
                    "discarding reply for a request that already timed out"
                );
            }
            SlotState::Ready(_) => {}
        }
    }

    /// Blocks until the slot is filled or `timeout` elapses.
    ///
    /// Returns `None` on timeout and marks the slot abandoned.
    pub(crate) fn wait(&self, timeout: Duration) -> Option<CommandOutcome> {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut state, _) = self
            .ready
            .wait_timeout_while(guard, timeout, |state| {
                matches!(state, SlotState::Waiting)
            })
            .unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *state, SlotState::Abandoned) {
            SlotState::Ready(outcome) => Some(outcome),
            SlotState::Waiting | SlotState::Abandoned => None,
        }
    }
}
