//! Lifecycle events reported by the engine.

use std::net::SocketAddr;
use std::sync::Arc;

use gifbox_config::Config;

use crate::app::ExitReason;
use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer for engine lifecycle events.
pub trait HealthReporter: Send + Sync {
    /// Configuration loading is about to begin.
    fn bootstrap_starting(&self);

    /// Configuration and telemetry are ready.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Bootstrap failed and the engine will not start.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// The HTTP listener is bound and accepting connections.
    fn listener_ready(&self, addr: SocketAddr);

    /// The application loop is shutting down.
    fn shutdown_requested(&self, reason: ExitReason);

    /// Every engine thread has stopped.
    fn shutdown_completed(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn listener_ready(&self, addr: SocketAddr) {
        (**self).listener_ready(addr);
    }

    fn shutdown_requested(&self, reason: ExitReason) {
        (**self).shutdown_requested(reason);
    }

    fn shutdown_completed(&self) {
        (**self).shutdown_completed();
    }
}

/// Reporter that emits each event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "loading engine configuration"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            film = config.film(),
            log_filter = config.log_filter(),
            log_format = %config.log_format(),
            "engine bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "engine bootstrap failed"
        );
    }

    fn listener_ready(&self, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_ready",
            %addr,
            "control server accepting connections"
        );
    }

    fn shutdown_requested(&self, reason: ExitReason) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_requested",
            ?reason,
            "engine shutting down"
        );
    }

    fn shutdown_completed(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "shutdown_completed",
            "engine stopped"
        );
    }
}
