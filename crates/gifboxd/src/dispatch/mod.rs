//! Command dispatch for HTTP control requests.
//!
//! A request target such as `/setFilm?clip&30&5.0` is percent-decoded,
//! matched against the fixed set of command paths and split into argument
//! tokens. The resulting [`Command`](gifbox_types::Command) goes through the
//! [`CommandQueue`](crate::queue::CommandQueue) and the handler renders the
//! outcome as a reply.

mod decode;
mod errors;
mod handler;

pub use self::decode::{decode_target, percent_decode, route, tokenize};
pub use self::errors::{DecodeError, DispatchError};
pub use self::handler::CommandDispatcher;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
