//! In-memory collaborators for running the whole engine in a test.

use crate::app::{FilmError, FilmLibrary, SequenceRecorder};
use crate::process::CollaboratorBuilder;

const STUB_FILM_FRAMES: u32 = 48;

/// Film library that knows every film except `missing`.
#[derive(Debug, Default)]
pub struct StubFilms {
    frames: u32,
}

impl FilmLibrary for StubFilms {
    fn load(&mut self, name: &str, frames: u32, _fps: f32) -> Result<u32, FilmError> {
        if name == "missing" {
            return Err(FilmError::Empty {
                name: name.to_owned(),
            });
        }
        self.frames = if frames == 0 { STUB_FILM_FRAMES } else { frames };
        Ok(self.frames)
    }

    fn restart(&mut self) {}

    fn frame_count(&self) -> u32 {
        self.frames
    }

    fn advance(&mut self) -> bool {
        true
    }
}

/// Builds [`StubFilms`] with the real [`SequenceRecorder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StubCollaborators;

impl CollaboratorBuilder for StubCollaborators {
    type Films = StubFilms;
    type Recorder = SequenceRecorder;

    fn build(&self, _config: &gifbox_config::Config) -> (StubFilms, SequenceRecorder) {
        let mut films = StubFilms::default();
        films.load("stub", 0, 5.0).expect("stub film loads");
        (films, SequenceRecorder::new())
    }
}
