//! Application state owned by the loop.

use camino::Utf8PathBuf;
use gifbox_config::Config;

/// How many frames a recording captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordBudget {
    /// A fixed number of frames.
    Frames(u32),
    /// One full pass of the current film.
    WholeFilm,
}

impl RecordBudget {
    /// Negative configuration values select [`RecordBudget::WholeFilm`].
    #[must_use]
    pub fn from_setting(frames: i32) -> Self {
        u32::try_from(frames).map_or(Self::WholeFilm, Self::Frames)
    }

    /// Frames to capture given the current film length.
    #[must_use]
    pub const fn resolve(self, film_frames: u32) -> u32 {
        match self {
            Self::Frames(frames) => frames,
            Self::WholeFilm => film_frames,
        }
    }
}

/// Mutable state shared by command execution and the per-frame work.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Cleared by `quit`; the loop exits once it is false.
    pub running: bool,
    /// Whether the composited output goes to the loopback device.
    pub sending_output: bool,
    /// Index of the loopback device receiving the output.
    pub output_device: u32,
    /// Whether a recording is in progress.
    pub recording: bool,
    /// Length of new recordings.
    pub record_budget: RecordBudget,
    /// Path prefix handed to the recorder.
    pub record_prefix: Utf8PathBuf,
    /// Name of the film currently playing.
    pub current_film: String,
    /// Frame count of the current film.
    pub film_frames: u32,
    /// Frame rate of the current film.
    pub film_fps: f32,
}

impl AppState {
    /// Initial state derived from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            running: true,
            sending_output: false,
            output_device: config.output_device(),
            recording: false,
            record_budget: RecordBudget::from_setting(config.max_record_frames()),
            record_prefix: config.record_prefix().to_owned(),
            current_film: config.film().to_owned(),
            film_frames: config.film_frames(),
            film_fps: config.film_fps(),
        }
    }
}
