//! Control engine for the gifbox photo booth.
//!
//! Remote clients drive the booth with single-shot `HTTP/1.0` requests such
//! as `GET /record` or `GET /setFilm?clip&30&5.0`. Each connection is parsed
//! by an explicit byte-level state machine ([`RequestParser`]), decoded into
//! a [`Command`](gifbox_types::Command) and handed to the application loop
//! through the [`CommandQueue`]. The network thread blocks, with a timeout,
//! until the loop has executed the command and resolved its reply.
//!
//! The application loop ([`AppLoop`]) runs at a fixed period on the thread
//! that called [`run_engine`]. It owns the [`AppState`] and the
//! [`FilmLibrary`] and [`Recorder`] collaborators; nothing on the network
//! side touches them directly.
//!
//! Start-up loads configuration through [`gifbox_config`], installs the
//! tracing subscriber and binds the listener; a bind failure is fatal.
//! `SIGTERM`, `SIGINT` and `SIGQUIT` stop the loop, after which the
//! listener closes every open connection.

mod app;
mod bootstrap;
mod dispatch;
mod health;
mod http;
mod process;
mod queue;
pub mod telemetry;
mod transport;

pub use app::{
    AppLoop, AppState, DEFAULT_REPLY, DirectoryFilmLibrary, ExitReason, FILM_FAILED, FILM_LOADED,
    FilmError, FilmLibrary, MISSING_FILM_ARGUMENTS, NOT_RECORDING, RECORDING, RecordBudget,
    Recorder, SequenceRecorder, execute,
};
pub use bootstrap::{
    BootstrapError, ConfigLoader, Engine, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{CommandDispatcher, DecodeError, DispatchError, decode_target, percent_decode};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use http::{Header, HttpVersion, ParseStatus, Reply, Request, RequestParser, StatusCode};
pub use process::{
    CollaboratorBuilder, DirectoryCollaborators, LaunchError, ShutdownError, ShutdownSignal,
    SystemShutdownSignal, run_engine,
};
pub use queue::{CommandOutcome, CommandQueue, PendingCommand, ReplyCallback};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{HttpListener, ListenerError, ListenerHandle, RequestHandler};

#[cfg(test)]
mod tests;
