//! Parsed request representation.

use std::fmt;

/// A single `name: value` header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Header name as written by the client.
    pub name: String,
    /// Header value with continuation lines folded in.
    pub value: String,
}

impl Header {
    /// Builds a header from its name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Protocol version from the request line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpVersion {
    /// Major version digit(s).
    pub major: u32,
    /// Minor version digit(s).
    pub minor: u32,
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// A request received from a control client.
///
/// Instances start empty and are filled in by [`RequestParser`] as bytes
/// arrive.
///
/// [`RequestParser`]: super::RequestParser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub(crate) method: String,
    pub(crate) target: String,
    pub(crate) version: HttpVersion,
    pub(crate) headers: Vec<Header>,
}

impl Request {
    /// Request method token, e.g. `GET`.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Raw request target: path plus optional `?query`.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Target up to the first `?`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.target
            .split_once('?')
            .map_or(self.target.as_str(), |(path, _)| path)
    }

    /// Raw query string after the first `?`, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }

    /// Protocol version.
    #[must_use]
    pub const fn version(&self) -> HttpVersion {
        self.version
    }

    /// Headers in the order they were received.
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Case-insensitive lookup of the first header named `name`.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
    }
}
