//! Configuration loaders for the success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use gifbox_config::{Config, ListenEndpoint};
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::ConfigLoader;

/// Loader yielding an ephemeral loopback endpoint and a fast loop period.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestConfigLoader;

impl TestConfigLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen: ListenEndpoint::new("127.0.0.1", 0),
            frame_period_ms: 5,
            log_filter: String::from("warn"),
            max_record_frames: 400,
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an unknown log format on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("gifboxd"),
            OsString::from("--log-format"),
            OsString::from("pretty"),
        ];
        Config::load_from_iter(args)
    }
}
