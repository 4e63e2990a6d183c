//! Behaviour suites for the engine.

mod support;
