//! Collaborators used by the daemon binary.
//!
//! [`DirectoryFilmLibrary`] validates films on disk and tracks playback
//! timing; [`SequenceRecorder`] counts captured frames and names finished
//! recordings. Neither touches pixels.

use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use super::APP_TARGET;
use super::collaborators::{FilmError, FilmLibrary, Recorder};

const PLANE_DIR: &str = "plan";
const FRAME_FILE: &str = "Frame";
const PLANES: u32 = 2;

#[derive(Debug, Clone)]
struct LoadedFilm {
    name: String,
    frames: u32,
    fps: f32,
}

/// Films stored as `<films_dir>/<name>/plan<P>/Frame<N>.png`.
#[derive(Debug)]
pub struct DirectoryFilmLibrary {
    films_dir: Utf8PathBuf,
    current: Option<LoadedFilm>,
    started: Instant,
    shown: Option<u64>,
}

impl DirectoryFilmLibrary {
    /// Creates a library with nothing loaded.
    #[must_use]
    pub fn new(films_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            films_dir: films_dir.into(),
            current: None,
            started: Instant::now(),
            shown: None,
        }
    }

    /// Name of the loaded film.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|film| film.name.as_str())
    }

    fn frame_path(root: &Utf8Path, plane: u32, frame: u32) -> Utf8PathBuf {
        root.join(format!("{PLANE_DIR}{plane}"))
            .join(format!("{FRAME_FILE}{frame}.png"))
    }

    fn discover_frames(root: &Utf8Path) -> u32 {
        let mut frames = 0;
        while Self::frame_path(root, 1, frames + 1).is_file() {
            frames += 1;
        }
        frames
    }

    fn verify_frames(root: &Utf8Path, frames: u32) -> Result<(), FilmError> {
        for frame in 1..=frames {
            for plane in 1..=PLANES {
                let path = Self::frame_path(root, plane, frame);
                if !path.is_file() {
                    return Err(FilmError::MissingFrame { path });
                }
            }
        }
        Ok(())
    }

    fn frame_index(&self, film: &LoadedFilm) -> u64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        let frame = (elapsed * f64::from(film.fps)) as u64;
        frame % u64::from(film.frames.max(1))
    }
}

impl FilmLibrary for DirectoryFilmLibrary {
    fn load(&mut self, name: &str, frames: u32, fps: f32) -> Result<u32, FilmError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FilmError::InvalidFrameRate {
                name: name.to_owned(),
                fps,
            });
        }
        let root = self.films_dir.join(name);
        if !root.is_dir() {
            return Err(FilmError::MissingDirectory { path: root });
        }
        let frames = if frames == 0 {
            Self::discover_frames(&root)
        } else {
            frames
        };
        if frames == 0 {
            return Err(FilmError::Empty {
                name: name.to_owned(),
            });
        }
        Self::verify_frames(&root, frames)?;

        self.current = Some(LoadedFilm {
            name: name.to_owned(),
            frames,
            fps,
        });
        self.restart();
        info!(target: APP_TARGET, film = name, frames, fps, "film loaded");
        Ok(frames)
    }

    fn restart(&mut self) {
        self.started = Instant::now();
        self.shown = None;
    }

    fn frame_count(&self) -> u32 {
        self.current.as_ref().map_or(0, |film| film.frames)
    }

    fn advance(&mut self) -> bool {
        let Some(film) = self.current.as_ref() else {
            return false;
        };
        let index = self.frame_index(film);
        let changed = self.shown != Some(index);
        self.shown = Some(index);
        changed
    }
}

#[derive(Debug)]
struct ActiveRecording {
    name: String,
    frames_left: u32,
}

/// Counts frames into numbered recordings.
#[derive(Debug, Default)]
pub struct SequenceRecorder {
    active: Option<ActiveRecording>,
    completed: u32,
    last_name: String,
}

impl SequenceRecorder {
    /// Creates an idle recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&mut self, name: String) {
        self.completed += 1;
        info!(target: APP_TARGET, record = %name, "recording finished");
        self.last_name = name;
    }
}

impl Recorder for SequenceRecorder {
    fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    fn frames_left(&self) -> u32 {
        self.active.as_ref().map_or(0, |active| active.frames_left)
    }

    fn begin(&mut self, prefix: &Utf8Path, frames: u32) {
        let stem = prefix.file_name().unwrap_or("gifbox");
        let name = format!("{stem}_{:04}", self.completed + 1);
        info!(target: APP_TARGET, record = %name, frames, "recording started");
        if frames == 0 {
            self.finish(name);
            return;
        }
        self.active = Some(ActiveRecording {
            name,
            frames_left: frames,
        });
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            info!(
                target: APP_TARGET,
                record = %active.name,
                frames_left = active.frames_left,
                "recording stopped early"
            );
        }
    }

    fn last_record_name(&self) -> String {
        self.last_name.clone()
    }

    fn capture_frame(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.frames_left = active.frames_left.saturating_sub(1);
        if active.frames_left > 0 {
            return false;
        }
        if let Some(done) = self.active.take() {
            self.finish(done.name);
        }
        true
    }
}
