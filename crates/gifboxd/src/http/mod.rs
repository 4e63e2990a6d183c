//! HTTP/1.0 wire model for the control protocol.
//!
//! Only the subset the control clients use is supported: a request line,
//! header lines and a blank line. Bodies are ignored and every reply is
//! rendered in full before it is written.

mod parser;
mod reply;
mod request;

pub use self::parser::{ParseStatus, RequestParser};
pub use self::reply::{Reply, StatusCode};
pub use self::request::{Header, HttpVersion, Request};
