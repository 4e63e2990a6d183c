//! Fixed-period application loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::queue::CommandQueue;

use super::APP_TARGET;
use super::collaborators::{FilmLibrary, Recorder};
use super::commands::execute;
use super::state::AppState;

const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Why [`AppLoop::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A `/quit` command cleared the running flag.
    Quit,
    /// The stop flag was raised from another thread.
    Stopped,
}

/// Owns the application state and drains the command queue once per tick.
pub struct AppLoop<F, R> {
    state: AppState,
    films: F,
    recorder: R,
    queue: Arc<CommandQueue>,
    period: Duration,
    stop: Arc<AtomicBool>,
}

impl<F, R> AppLoop<F, R>
where
    F: FilmLibrary,
    R: Recorder,
{
    /// Builds a loop ticking every `period`.
    pub fn new(
        state: AppState,
        films: F,
        recorder: R,
        queue: Arc<CommandQueue>,
        period: Duration,
    ) -> Self {
        Self {
            state,
            films,
            recorder,
            queue,
            period,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replaces the stop flag with one shared with the caller.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Flag that ends [`AppLoop::run`] after the current tick.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Current application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Advances playback and executes every queued command.
    ///
    /// Returns the number of commands executed.
    pub fn tick(&mut self) -> usize {
        if self.films.advance() && self.recorder.capture_frame() {
            self.state.recording = false;
        }

        let mut executed = 0;
        while let Some(pending) = self.queue.drain_next() {
            let (command, callback) = pending.into_parts();
            let outcome = execute(
                &mut self.state,
                &mut self.films,
                &mut self.recorder,
                &command,
            );
            debug!(
                target: APP_TARGET,
                command = %command.id(),
                success = outcome.success,
                "command executed"
            );
            callback.resolve(outcome);
            executed += 1;
        }
        executed
    }

    /// Ticks until a quit command or the stop flag ends the loop.
    pub fn run(&mut self) -> ExitReason {
        info!(target: APP_TARGET, period_ms = self.period.as_millis(), "application loop started");
        let reason = loop {
            let started = Instant::now();
            self.tick();
            if !self.state.running {
                break ExitReason::Quit;
            }
            if self.stop.load(Ordering::SeqCst) {
                break ExitReason::Stopped;
            }
            let remaining = self.period.saturating_sub(started.elapsed());
            thread::sleep(remaining.max(MIN_SLEEP));
        };
        info!(target: APP_TARGET, ?reason, "application loop finished");
        reason
    }
}
