//! Errors surfaced while turning a request target into a command.

use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures while percent-decoding a request target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` escape ran past the end of the input.
    #[error("truncated percent escape at byte {offset}")]
    TruncatedEscape {
        /// Offset of the `%` that starts the escape.
        offset: usize,
    },
    /// A `%` escape was not followed by two hex digits.
    #[error("invalid percent escape at byte {offset}")]
    InvalidEscape {
        /// Offset of the `%` that starts the escape.
        offset: usize,
    },
    /// The decoded bytes were not UTF-8.
    #[error("decoded target is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Reasons a request is rejected before reaching the command queue.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The target did not start with a known command path.
    #[error("unknown command path '{path}'")]
    UnknownPath {
        /// Decoded path of the rejected request.
        path: String,
    },
    /// The target could not be decoded.
    #[error("failed to decode request target: {source}")]
    Decode {
        /// Underlying decoding error.
        #[source]
        source: DecodeError,
    },
}

impl From<DecodeError> for DispatchError {
    fn from(source: DecodeError) -> Self {
        Self::Decode { source }
    }
}
