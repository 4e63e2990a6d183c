//! Command execution on the application thread.

use gifbox_types::{Command, CommandId, Value};
use tracing::{info, warn};

use crate::queue::CommandOutcome;

use super::APP_TARGET;
use super::collaborators::{FilmError, FilmLibrary, Recorder};
use super::state::AppState;

/// Reply for commands with nothing specific to report.
pub const DEFAULT_REPLY: &str = "Default reply";
/// Reply when `/setFilm` lacks arguments.
pub const MISSING_FILM_ARGUMENTS: &str = "Need to specify film name, frame number and framerate";
/// Reply when a film loaded.
pub const FILM_LOADED: &str = "Success";
/// Reply when a film failed to load.
pub const FILM_FAILED: &str = "Failed";
/// Status reply while recording.
pub const RECORDING: &str = "Recording";
/// Status reply while idle.
pub const NOT_RECORDING: &str = "Not recording";

/// Executes `command` against the state and collaborators.
///
/// Every recognised command succeeds; a film that fails to load is
/// reported in the payload rather than as a failure. Only the empty command
/// fails.
pub fn execute<F, R>(
    state: &mut AppState,
    films: &mut F,
    recorder: &mut R,
    command: &Command,
) -> CommandOutcome
where
    F: FilmLibrary + ?Sized,
    R: Recorder + ?Sized,
{
    match command.id() {
        CommandId::None => CommandOutcome::failure(),
        CommandId::Quit => {
            state.running = false;
            info!(target: APP_TARGET, "quit requested");
            default_reply()
        }
        CommandId::Start => {
            state.sending_output = true;
            info!(target: APP_TARGET, device = state.output_device, "sending output");
            default_reply()
        }
        CommandId::Stop => {
            recorder.stop();
            state.sending_output = false;
            state.recording = false;
            default_reply()
        }
        CommandId::Record => {
            state.recording = recorder.is_recording();
            if !state.recording {
                films.restart();
                let frames = state.record_budget.resolve(films.frame_count());
                recorder.begin(&state.record_prefix, frames);
                state.recording = true;
            }
            default_reply()
        }
        CommandId::SelectContent => select_content(state, films, command),
        CommandId::QueryRecordName => {
            CommandOutcome::success(vec![Value::from(recorder.last_record_name())])
        }
        CommandId::QueryRecordingStatus => {
            state.recording = recorder.is_recording();
            if state.recording {
                CommandOutcome::success(vec![
                    Value::from(RECORDING),
                    Value::from(recorder.frames_left()),
                ])
            } else {
                CommandOutcome::success(vec![Value::from(NOT_RECORDING)])
            }
        }
    }
}

fn default_reply() -> CommandOutcome {
    CommandOutcome::success(vec![Value::from(DEFAULT_REPLY)])
}

fn select_content<F>(state: &mut AppState, films: &mut F, command: &Command) -> CommandOutcome
where
    F: FilmLibrary + ?Sized,
{
    // Token 0 is the path head; the film arguments follow it.
    let (Some(name), Some(frames), Some(fps)) = (command.arg(1), command.arg(2), command.arg(3))
    else {
        return CommandOutcome::success(vec![Value::from(MISSING_FILM_ARGUMENTS)]);
    };

    let name = name.as_string();
    let fps = fps.as_float();
    let result = u32::try_from(frames.as_int())
        .map_err(|_| FilmError::InvalidFrameCount {
            name: name.clone(),
            frames: frames.as_int(),
        })
        .and_then(|frames| films.load(&name, frames, fps));

    match result {
        Ok(frames) => {
            state.current_film = name;
            state.film_frames = frames;
            state.film_fps = fps;
            CommandOutcome::success(vec![Value::from(FILM_LOADED)])
        }
        Err(error) => {
            warn!(target: APP_TARGET, film = %name, %error, "film failed to load");
            CommandOutcome::success(vec![Value::from(FILM_FAILED)])
        }
    }
}
