use camino::Utf8PathBuf;

use crate::endpoint::ListenEndpoint;
use crate::logging::LogFormat;

/// Default host the control server binds to.
pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";

/// Default TCP port for the control server.
pub const DEFAULT_LISTEN_PORT: u16 = 8080;

/// Time a request waits for the application loop to answer.
pub const DEFAULT_REPLY_TIMEOUT_MS: u64 = 2000;

/// Application loop period; 33 ms is roughly 30 frames per second.
pub const DEFAULT_FRAME_PERIOD_MS: u64 = 33;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Film played when none is selected.
pub const DEFAULT_FILM: &str = "ALL_THE_RAGE";

/// Default playback rate of pre-rendered films.
pub const DEFAULT_FILM_FPS: f32 = 5.0;

/// Default recording budget in frames.
pub const DEFAULT_MAX_RECORD_FRAMES: i32 = 120;

/// Default control endpoint.
pub fn default_listen_endpoint() -> ListenEndpoint {
    ListenEndpoint::new(DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT)
}

/// Default reply timeout in milliseconds.
pub const fn default_reply_timeout_ms() -> u64 {
    DEFAULT_REPLY_TIMEOUT_MS
}

/// Default application loop period in milliseconds.
pub const fn default_frame_period_ms() -> u64 {
    DEFAULT_FRAME_PERIOD_MS
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Directory holding one sub-directory per film.
pub fn default_films_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("./films")
}

/// Owned default film name.
pub fn default_film() -> String {
    DEFAULT_FILM.to_owned()
}

/// Default frame count of the initial film; `0` lets the loader discover it.
pub const fn default_film_frames() -> u32 {
    0
}

/// Default film frame rate.
pub const fn default_film_fps() -> f32 {
    DEFAULT_FILM_FPS
}

/// Default recording budget.
pub const fn default_max_record_frames() -> i32 {
    DEFAULT_MAX_RECORD_FRAMES
}

/// Prefix of recorded sequences.
pub fn default_record_prefix() -> Utf8PathBuf {
    Utf8PathBuf::from("/tmp/gifbox_result")
}

/// Default video loopback device index.
pub const fn default_output_device() -> u32 {
    0
}
