//! HTTP transport for the control endpoint.
//!
//! The listener binds the configured TCP endpoint and accepts connections
//! on a background thread. Each accepted connection is registered with the
//! connection manager and served on its own thread, so a request blocked on
//! the application loop never delays other clients.

mod connection;
mod errors;
mod handler;
mod listener;
mod manager;
#[cfg(test)]
mod test_utils;

pub use self::errors::ListenerError;
pub use self::handler::RequestHandler;
pub use self::listener::{HttpListener, ListenerHandle};
#[cfg(test)]
pub(crate) use self::test_utils::CountingHandler;

pub(crate) const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
