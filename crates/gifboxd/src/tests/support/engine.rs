//! Runs the full engine on a background thread.

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::app::ExitReason;
use crate::health::HealthReporter;
use crate::process::LaunchError;
use crate::process::launch::{LaunchPlan, ProcessControl, ServiceDeps, run_engine_with};

use super::client::HttpExchange;
use super::collaborators::StubCollaborators;
use super::config_loader::TestConfigLoader;
use super::reporter::RecordingHealthReporter;
use super::shutdown::TestShutdownSignal;

const START_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

type EngineThread = JoinHandle<Result<ExitReason, LaunchError>>;

/// An engine serving on an ephemeral port.
pub struct RunningEngine {
    addr: SocketAddr,
    reporter: Arc<RecordingHealthReporter>,
    shutdown: TestShutdownSignal,
    thread: Option<EngineThread>,
}

impl RunningEngine {
    /// Starts the engine and waits for its listener.
    pub fn start() -> Result<Self, String> {
        let reporter = Arc::new(RecordingHealthReporter::default());
        let shutdown = TestShutdownSignal::default();
        let shared: Arc<dyn HealthReporter> = reporter.clone();
        let plan = LaunchPlan {
            process: ProcessControl {
                shutdown: shutdown.clone(),
            },
            services: ServiceDeps {
                loader: TestConfigLoader::new(),
                reporter: shared,
                collaborators: StubCollaborators,
            },
        };
        let thread = thread::Builder::new()
            .name(String::from("gifboxd-test-engine"))
            .spawn(move || run_engine_with(plan))
            .map_err(|error| format!("spawn engine: {error}"))?;

        let deadline = Instant::now() + START_TIMEOUT;
        let addr = loop {
            if let Some(addr) = reporter.listener_addr() {
                break addr;
            }
            if thread.is_finished() || Instant::now() >= deadline {
                shutdown.trigger();
                let outcome = thread.join();
                return Err(format!("engine did not start listening: {outcome:?}"));
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(Self {
            addr,
            reporter,
            shutdown,
            thread: Some(thread),
        })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn reporter(&self) -> &RecordingHealthReporter {
        &self.reporter
    }

    /// Issues `GET {target}` against the engine.
    pub fn get(&self, target: &str) -> Result<HttpExchange, String> {
        HttpExchange::get(self.addr, target)
    }

    /// Raises the shutdown signal without waiting.
    pub fn signal_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Waits for the engine thread to return.
    pub fn join(&mut self) -> Result<ExitReason, String> {
        let thread = self
            .thread
            .take()
            .ok_or_else(|| String::from("engine already joined"))?;
        thread
            .join()
            .map_err(|_| String::from("engine thread panicked"))?
            .map_err(|error| error.to_string())
    }
}

impl Drop for RunningEngine {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            self.shutdown.trigger();
            let _ = thread.join();
        }
    }
}
