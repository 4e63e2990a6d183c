use std::io;
use std::sync::{Mutex, PoisonError};

use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Source of the external request to stop the engine.
pub trait ShutdownSignal: Send + Sync + 'static {
    /// Blocks until shutdown is requested or [`ShutdownSignal::release`] is
    /// called.
    fn wait(&self) -> Result<(), ShutdownError>;

    /// Wakes a blocked [`ShutdownSignal::wait`] once the engine is already
    /// stopping for another reason.
    fn release(&self);
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Waits for `SIGTERM`, `SIGINT` or `SIGQUIT`.
pub struct SystemShutdownSignal {
    signals: Mutex<Signals>,
    handle: Handle,
}

impl SystemShutdownSignal {
    /// Installs the signal handlers.
    ///
    /// The handlers stay registered for the life of the value, so a signal
    /// delivered before [`ShutdownSignal::wait`] runs is not lost.
    pub fn install() -> Result<Self, ShutdownError> {
        let signals = Signals::new([SIGTERM, SIGINT, SIGQUIT])
            .map_err(|source| ShutdownError::Install { source })?;
        let handle = signals.handle();
        Ok(Self {
            signals: Mutex::new(signals),
            handle,
        })
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(signal) = signals.forever().next() {
            info!(target: PROCESS_TARGET, signal, "shutdown signal received");
        }
        Ok(())
    }

    fn release(&self) {
        self.handle.close();
    }
}
