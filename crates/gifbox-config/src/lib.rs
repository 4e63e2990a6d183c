//! Shared configuration for the GifBox control daemon.
//!
//! Values layer in the usual `ortho_config` order: built-in defaults, then a
//! TOML file (`--config-path` or `GIFBOX_CONFIG_PATH`), then `GIFBOX_*`
//! environment variables, then command-line flags.

mod defaults;
mod endpoint;
mod logging;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_FILM, DEFAULT_FILM_FPS, DEFAULT_FRAME_PERIOD_MS, DEFAULT_LISTEN_HOST,
    DEFAULT_LISTEN_PORT, DEFAULT_LOG_FILTER, DEFAULT_MAX_RECORD_FRAMES, DEFAULT_REPLY_TIMEOUT_MS,
    default_film, default_film_fps, default_film_frames, default_films_dir,
    default_frame_period_ms, default_listen_endpoint, default_log_filter,
    default_log_filter_string, default_log_format, default_max_record_frames,
    default_output_device, default_record_prefix, default_reply_timeout_ms,
};
pub use endpoint::{EndpointParseError, ListenEndpoint};
pub use logging::{LogFormat, LogFormatParseError, LogSettings};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "GIFBOX")]
pub struct Config {
    /// Endpoint the HTTP control server binds.
    #[ortho_config(default = default_listen_endpoint())]
    #[serde(default = "default_listen_endpoint")]
    pub listen: ListenEndpoint,
    /// Milliseconds a request waits for the application loop.
    #[ortho_config(default = default_reply_timeout_ms())]
    #[serde(default = "default_reply_timeout_ms")]
    pub reply_timeout_ms: u64,
    /// Milliseconds between application loop iterations.
    #[ortho_config(default = default_frame_period_ms())]
    #[serde(default = "default_frame_period_ms")]
    pub frame_period_ms: u64,
    /// Tracing filter expression.
    #[ortho_config(default = default_log_filter_string())]
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for structured logs.
    #[ortho_config(default = default_log_format())]
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Directory with one sub-directory of frames per film.
    #[ortho_config(default = default_films_dir())]
    #[serde(default = "default_films_dir")]
    pub films_dir: Utf8PathBuf,
    /// Film loaded at start-up.
    #[ortho_config(default = default_film())]
    #[serde(default = "default_film")]
    pub film: String,
    /// Frame count of the start-up film; `0` discovers it from disk.
    #[ortho_config(default = default_film_frames())]
    #[serde(default = "default_film_frames")]
    pub film_frames: u32,
    /// Playback rate of the start-up film.
    #[ortho_config(default = default_film_fps())]
    #[serde(default = "default_film_fps")]
    pub film_fps: f32,
    /// Frames captured per recording; negative records the whole film.
    #[ortho_config(default = default_max_record_frames())]
    #[serde(default = "default_max_record_frames")]
    pub max_record_frames: i32,
    /// Path prefix of recorded sequences.
    #[ortho_config(default = default_record_prefix())]
    #[serde(default = "default_record_prefix")]
    pub record_prefix: Utf8PathBuf,
    /// Index of the video loopback device receiving the output.
    #[ortho_config(default = default_output_device())]
    #[serde(default = "default_output_device")]
    pub output_device: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            reply_timeout_ms: default_reply_timeout_ms(),
            frame_period_ms: default_frame_period_ms(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            films_dir: default_films_dir(),
            film: default_film(),
            film_frames: default_film_frames(),
            film_fps: default_film_fps(),
            max_record_frames: default_max_record_frames(),
            record_prefix: default_record_prefix(),
            output_device: default_output_device(),
        }
    }
}

impl Config {
    /// Endpoint the control server binds.
    #[must_use]
    pub fn listen(&self) -> &ListenEndpoint {
        &self.listen
    }

    /// How long a request waits for the application loop to answer.
    #[must_use]
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }

    /// Period between application loop iterations.
    #[must_use]
    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Logging settings in the shape the telemetry layer expects.
    #[must_use]
    pub fn logging(&self) -> LogSettings<'_> {
        LogSettings {
            filter: &self.log_filter,
            format: self.log_format,
        }
    }

    /// Directory holding the films.
    #[must_use]
    pub fn films_dir(&self) -> &Utf8Path {
        &self.films_dir
    }

    /// Film loaded at start-up.
    #[must_use]
    pub fn film(&self) -> &str {
        &self.film
    }

    /// Frame count of the start-up film.
    #[must_use]
    pub fn film_frames(&self) -> u32 {
        self.film_frames
    }

    /// Playback rate of the start-up film.
    #[must_use]
    pub fn film_fps(&self) -> f32 {
        self.film_fps
    }

    /// Recording budget in frames; negative means the whole film.
    #[must_use]
    pub fn max_record_frames(&self) -> i32 {
        self.max_record_frames
    }

    /// Path prefix of recorded sequences.
    #[must_use]
    pub fn record_prefix(&self) -> &Utf8Path {
        &self.record_prefix
    }

    /// Video loopback device index.
    #[must_use]
    pub fn output_device(&self) -> u32 {
        self.output_device
    }
}
