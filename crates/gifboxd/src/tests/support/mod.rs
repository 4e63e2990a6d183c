//! Doubles and harnesses shared by the behaviour suites.

mod client;
mod collaborators;
mod config_loader;
mod engine;
mod reporter;
mod shutdown;
mod world;

pub use client::HttpExchange;
pub use config_loader::TestConfigLoader;
pub use engine::RunningEngine;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
