//! Hand-off between the network threads and the application loop.
//!
//! Request handlers call [`CommandQueue::submit_and_wait`] and block until
//! the application loop, polling with [`CommandQueue::drain_next`], has
//! executed the command and resolved its [`ReplyCallback`]. Entries leave
//! the queue in submission order.

mod callback;

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use gifbox_types::Command;
use tracing::{debug, warn};

pub use self::callback::{CommandOutcome, ReplyCallback};
use self::callback::ReplySlot;

pub(crate) const QUEUE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::queue");

/// A command waiting for the application loop, paired with its callback.
#[derive(Debug)]
pub struct PendingCommand {
    command: Command,
    callback: ReplyCallback,
}

impl PendingCommand {
    /// The queued command.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Splits the entry into its command and callback.
    #[must_use]
    pub fn into_parts(self) -> (Command, ReplyCallback) {
        (self.command, self.callback)
    }

    /// Resolves the callback with `outcome`.
    pub fn resolve(self, outcome: CommandOutcome) {
        self.callback.resolve(outcome);
    }
}

/// Thread-safe FIFO of pending commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    entries: Mutex<VecDeque<PendingCommand>>,
}

impl CommandQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command with an arbitrary callback.
    pub fn enqueue(&self, command: Command, callback: ReplyCallback) {
        debug!(target: QUEUE_TARGET, command = %command.id(), "command queued");
        self.lock().push_back(PendingCommand { command, callback });
    }

    /// Queues `command` and blocks until it is resolved or `timeout` elapses.
    ///
    /// A timed-out entry stays queued; the application loop may still run
    /// it, but its outcome is discarded.
    pub fn submit_and_wait(&self, command: Command, timeout: Duration) -> CommandOutcome {
        let id = command.id();
        let slot = ReplySlot::new();
        self.enqueue(command, slot.callback());
        match slot.wait(timeout) {
            Some(outcome) => outcome,
            None => {
                warn!(
                    target: QUEUE_TARGET,
                    command = %id,
                    timeout_ms = timeout.as_millis(),
                    "command timed out waiting for the application loop"
                );
                CommandOutcome::failure()
            }
        }
    }

    /// Pops the oldest entry without blocking.
    pub fn drain_next(&self) -> Option<PendingCommand> {
        self.lock().pop_front()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<PendingCommand>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
