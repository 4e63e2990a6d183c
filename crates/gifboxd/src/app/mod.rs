//! Application side of the daemon: state, command execution and the loop.
//!
//! Requests reach this module only through the command queue; the loop
//! thread is the sole owner of [`AppState`].

mod collaborators;
mod commands;
mod runner;
mod simulated;
mod state;

pub use collaborators::{FilmError, FilmLibrary, Recorder};
pub use commands::{
    DEFAULT_REPLY, FILM_FAILED, FILM_LOADED, MISSING_FILM_ARGUMENTS, NOT_RECORDING, RECORDING,
    execute,
};
pub use runner::{AppLoop, ExitReason};
pub use simulated::{DirectoryFilmLibrary, SequenceRecorder};
pub use state::{AppState, RecordBudget};

pub(crate) const APP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::app");
