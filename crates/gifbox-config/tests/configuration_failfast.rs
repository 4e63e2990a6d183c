use std::ffi::{OsStr, OsString};
use std::fs;
use std::sync::{Mutex, MutexGuard};

use gifbox_config::Config;
use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        let previous = std::env::var_os(key);
        // Environment mutation is unsafe on edition 2024; restored in `Drop`.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn args(extra: &[&OsStr]) -> Vec<OsString> {
    std::iter::once(OsString::from("gifboxd"))
        .chain(extra.iter().map(|arg| arg.to_os_string()))
        .collect()
}

#[test]
fn malformed_config_file_fails_loading() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("gifbox.toml");
    fs::write(&path, r#"listen = { host = "127.0.0.1" port = 9000 }"#)
        .expect("write malformed config");

    let result = Config::load_from_iter(args(&[
        OsStr::new("--config-path"),
        path.as_os_str(),
    ]));

    let error = result.expect_err("malformed TOML must fail");
    assert!(!error.to_string().is_empty());
}

#[test]
fn mistyped_config_value_fails_loading() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("gifbox.toml");
    fs::write(&path, "reply_timeout_ms = \"soon\"\n").expect("write mistyped config");

    let _env = EnvOverride::set_var("GIFBOX_CONFIG_PATH", path.as_os_str());

    assert!(Config::load_from_iter(args(&[])).is_err());
}

#[test]
fn unknown_log_format_flag_fails_loading() {
    let result = Config::load_from_iter(args(&[
        OsStr::new("--log-format"),
        OsStr::new("pretty"),
    ]));
    assert!(result.is_err(), "unknown log format must be rejected");
}

#[test]
fn environment_selects_output_device() {
    let _env = EnvOverride::set_var("GIFBOX_OUTPUT_DEVICE", OsStr::new("2"));

    let config = Config::load_from_iter(args(&[])).expect("configuration loads");
    assert_eq!(config.output_device(), 2);
}
