//! Seams to the media side of the application.
//!
//! Film playback and recording are opaque to the control core; the loop
//! only drives them through these traits.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Failures while loading a film.
#[derive(Debug, Error)]
pub enum FilmError {
    /// The film directory does not exist.
    #[error("film directory '{path}' does not exist")]
    MissingDirectory {
        /// Expected film directory.
        path: Utf8PathBuf,
    },
    /// A frame image is missing.
    #[error("film frame '{path}' is missing")]
    MissingFrame {
        /// Path of the missing frame.
        path: Utf8PathBuf,
    },
    /// The film has no frames.
    #[error("film '{name}' has no frames")]
    Empty {
        /// Film name.
        name: String,
    },
    /// The frame count argument was negative.
    #[error("invalid frame count {frames} for film '{name}'")]
    InvalidFrameCount {
        /// Film name.
        name: String,
        /// Requested frame count.
        frames: i32,
    },
    /// The frame rate is not a positive number.
    #[error("invalid frame rate {fps} for film '{name}'")]
    InvalidFrameRate {
        /// Film name.
        name: String,
        /// Requested frame rate.
        fps: f32,
    },
}

/// Pre-rendered content played behind the subject.
#[cfg_attr(test, mockall::automock)]
pub trait FilmLibrary: Send {
    /// Replaces the current film and restarts playback.
    ///
    /// A `frames` value of `0` discovers the frame count. Returns the number
    /// of frames loaded.
    ///
    /// # Errors
    ///
    /// Returns [`FilmError`] when the film cannot be loaded; the previous
    /// film keeps playing.
    fn load(&mut self, name: &str, frames: u32, fps: f32) -> Result<u32, FilmError>;

    /// Restarts the current film from its first frame.
    fn restart(&mut self);

    /// Frame count of the current film, `0` when none is loaded.
    fn frame_count(&self) -> u32;

    /// Advances playback to the current time; true when the frame changed.
    fn advance(&mut self) -> bool;
}

/// Captures composited frames into a sequence on disk.
#[cfg_attr(test, mockall::automock)]
pub trait Recorder: Send {
    /// Whether a recording is in progress.
    fn is_recording(&self) -> bool;

    /// Frames still to capture in the current recording.
    fn frames_left(&self) -> u32;

    /// Starts capturing `frames` frames under `prefix`.
    fn begin(&mut self, prefix: &Utf8Path, frames: u32);

    /// Stops capturing.
    fn stop(&mut self);

    /// Name of the last completed recording, empty if none.
    fn last_record_name(&self) -> String;

    /// Captures the frame just shown; true when this completed the recording.
    fn capture_frame(&mut self) -> bool;
}
