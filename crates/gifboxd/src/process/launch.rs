//! Engine start-up and shutdown sequencing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use gifbox_config::Config;
use tracing::{info, warn};

use crate::app::{
    AppLoop, AppState, DirectoryFilmLibrary, ExitReason, FilmLibrary, Recorder, SequenceRecorder,
};
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::CommandDispatcher;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::queue::{CommandOutcome, CommandQueue};
use crate::transport::HttpListener;

use super::errors::LaunchError;
use super::shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};
use super::PROCESS_TARGET;

/// Builds the film library and recorder the application loop drives.
pub trait CollaboratorBuilder {
    /// Film library type.
    type Films: FilmLibrary;
    /// Recorder type.
    type Recorder: Recorder;

    /// Creates both collaborators for `config`.
    fn build(&self, config: &Config) -> (Self::Films, Self::Recorder);
}

/// Production collaborators: films read from `films_dir` and a frame
/// counting recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryCollaborators;

impl CollaboratorBuilder for DirectoryCollaborators {
    type Films = DirectoryFilmLibrary;
    type Recorder = SequenceRecorder;

    fn build(&self, config: &Config) -> (Self::Films, Self::Recorder) {
        let mut films = DirectoryFilmLibrary::new(config.films_dir());
        if let Err(error) = films.load(config.film(), config.film_frames(), config.film_fps()) {
            warn!(
                target: PROCESS_TARGET,
                film = config.film(),
                %error,
                "initial film failed to load"
            );
        }
        (films, SequenceRecorder::new())
    }
}

/// Process-level collaborators.
pub(crate) struct ProcessControl<S> {
    pub(crate) shutdown: S,
}

/// Service dependencies required to construct the engine.
pub(crate) struct ServiceDeps<L, B> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) collaborators: B,
}

/// Everything [`run_engine_with`] needs.
pub(crate) struct LaunchPlan<L, B, S> {
    pub(crate) process: ProcessControl<S>,
    pub(crate) services: ServiceDeps<L, B>,
}

/// Runs the engine with the production collaborators until `/quit` or a
/// termination signal.
pub fn run_engine() -> Result<ExitReason, LaunchError> {
    let plan = LaunchPlan {
        process: ProcessControl {
            shutdown: SystemShutdownSignal::install()?,
        },
        services: ServiceDeps {
            loader: SystemConfigLoader,
            reporter: Arc::new(StructuredHealthReporter::new()),
            collaborators: DirectoryCollaborators,
        },
    };
    run_engine_with(plan)
}

/// Runs the engine with injected collaborators.
///
/// The application loop runs on the calling thread. The listener and the
/// signal watcher run on their own threads and are stopped before this
/// returns.
pub(crate) fn run_engine_with<L, B, S>(plan: LaunchPlan<L, B, S>) -> Result<ExitReason, LaunchError>
where
    L: ConfigLoader,
    B: CollaboratorBuilder,
    S: ShutdownSignal,
{
    let LaunchPlan { process, services } = plan;
    let ProcessControl { shutdown } = process;
    let ServiceDeps {
        loader,
        reporter,
        collaborators,
    } = services;

    let engine = bootstrap_with(&loader, Arc::clone(&reporter))?;
    let config = engine.config();
    info!(target: PROCESS_TARGET, listen = %config.listen(), "starting engine");

    let listener = HttpListener::bind(config.listen())?;
    reporter.listener_ready(listener.local_addr());

    let queue = Arc::new(CommandQueue::new());
    let dispatcher = CommandDispatcher::new(Arc::clone(&queue), config.reply_timeout());
    let listener_handle = listener.start(Arc::new(dispatcher))?;

    let (films, recorder) = collaborators.build(config);
    let mut state = AppState::from_config(config);
    if films.frame_count() > 0 {
        state.film_frames = films.frame_count();
    }

    let shutdown = Arc::new(shutdown);
    let stop = Arc::new(AtomicBool::new(false));
    let watcher = spawn_signal_watcher(Arc::clone(&shutdown), Arc::clone(&stop))?;

    let mut app = AppLoop::new(
        state,
        films,
        recorder,
        Arc::clone(&queue),
        config.frame_period(),
    )
    .with_stop_flag(stop);
    let reason = app.run();
    reporter.shutdown_requested(reason);

    shutdown.release();
    let watched = watcher.join().map_err(|_| LaunchError::WatcherPanic)?;

    let mut abandoned = 0_usize;
    while let Some(pending) = queue.drain_next() {
        pending.resolve(CommandOutcome::failure());
        abandoned += 1;
    }
    if abandoned > 0 {
        info!(target: PROCESS_TARGET, abandoned, "failed commands left after the loop stopped");
    }

    listener_handle.stop()?;
    watched?;
    reporter.shutdown_completed();
    info!(target: PROCESS_TARGET, ?reason, "shutdown sequence completed");
    Ok(reason)
}

fn spawn_signal_watcher<S>(
    shutdown: Arc<S>,
    stop: Arc<AtomicBool>,
) -> Result<JoinHandle<Result<(), ShutdownError>>, LaunchError>
where
    S: ShutdownSignal,
{
    thread::Builder::new()
        .name(String::from("gifboxd-signals"))
        .spawn(move || {
            let result = shutdown.wait();
            stop.store(true, Ordering::SeqCst);
            result
        })
        .map_err(|source| LaunchError::Spawn { source })
}
