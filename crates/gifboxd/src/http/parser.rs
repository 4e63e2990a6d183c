//! Incremental request parser.
//!
//! The parser is a byte-at-a-time state machine for the grammar
//!
//! ```text
//! METHOD SP TARGET SP HTTP/D.D CRLF (NAME ':' SP? VALUE CRLF)* CRLF
//! ```
//!
//! Header values may continue on following lines that start with a space or
//! tab. Any byte that does not fit the current state yields
//! [`ParseStatus::Malformed`]; the parser never resynchronises afterwards.

use super::request::{Header, Request};

/// Result of feeding input to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// More input is needed.
    Incomplete,
    /// The blank line ending the headers has been read.
    Complete,
    /// The input violates the request grammar.
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MethodStart,
    Method,
    Target,
    VersionH,
    VersionT1,
    VersionT2,
    VersionP,
    VersionSlash,
    MajorStart,
    Major,
    MinorStart,
    Minor,
    RequestLineEnd,
    HeaderLineStart,
    HeaderContinuation,
    HeaderName,
    SpaceBeforeValue,
    HeaderValue,
    HeaderLineEnd,
    FinalLineEnd,
    Done,
    Failed,
}

/// Byte-level request parser.
#[derive(Debug, Clone)]
pub struct RequestParser {
    state: State,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// Creates a parser waiting for the first method byte.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::MethodStart,
        }
    }

    /// Returns the parser to its initial state.
    pub fn reset(&mut self) {
        self.state = State::MethodStart;
    }

    /// Feeds `bytes` until the request completes or turns out malformed.
    ///
    /// Returns the status and the number of bytes consumed. Bytes after a
    /// complete request (a body, which the protocol ignores) are left
    /// unconsumed.
    pub fn parse(&mut self, request: &mut Request, bytes: &[u8]) -> (ParseStatus, usize) {
        for (index, byte) in bytes.iter().enumerate() {
            let status = self.consume(request, *byte);
            if status != ParseStatus::Incomplete {
                return (status, index + 1);
            }
        }
        (ParseStatus::Incomplete, bytes.len())
    }

    /// Feeds a single byte.
    pub fn consume(&mut self, request: &mut Request, byte: u8) -> ParseStatus {
        let (next, status) = self.step(request, byte);
        self.state = next;
        status
    }

    fn step(&self, request: &mut Request, byte: u8) -> (State, ParseStatus) {
        use ParseStatus::{Complete, Incomplete};

        match self.state {
            State::MethodStart => {
                if !is_token(byte) {
                    return malformed();
                }
                request.method.push(char::from(byte));
                (State::Method, Incomplete)
            }
            State::Method => match byte {
                b' ' => (State::Target, Incomplete),
                _ if is_token(byte) => {
                    request.method.push(char::from(byte));
                    (State::Method, Incomplete)
                }
                _ => malformed(),
            },
            State::Target => match byte {
                b' ' => (State::VersionH, Incomplete),
                _ if is_char(byte) && !is_ctl(byte) => {
                    request.target.push(char::from(byte));
                    (State::Target, Incomplete)
                }
                _ => malformed(),
            },
            State::VersionH => literal(byte, b'H', State::VersionT1),
            State::VersionT1 => literal(byte, b'T', State::VersionT2),
            State::VersionT2 => literal(byte, b'T', State::VersionP),
            State::VersionP => literal(byte, b'P', State::VersionSlash),
            State::VersionSlash => {
                if byte != b'/' {
                    return malformed();
                }
                request.version.major = 0;
                request.version.minor = 0;
                (State::MajorStart, Incomplete)
            }
            State::MajorStart => match digit(byte) {
                Some(value) => {
                    request.version.major = value;
                    (State::Major, Incomplete)
                }
                None => malformed(),
            },
            State::Major => match byte {
                b'.' => (State::MinorStart, Incomplete),
                _ => accumulate(&mut request.version.major, byte, State::Major),
            },
            State::MinorStart => match digit(byte) {
                Some(value) => {
                    request.version.minor = value;
                    (State::Minor, Incomplete)
                }
                None => malformed(),
            },
            State::Minor => match byte {
                b'\r' => (State::RequestLineEnd, Incomplete),
                _ => accumulate(&mut request.version.minor, byte, State::Minor),
            },
            State::RequestLineEnd => literal(byte, b'\n', State::HeaderLineStart),
            State::HeaderLineStart => match byte {
                b'\r' => (State::FinalLineEnd, Incomplete),
                b' ' | b'\t' if !request.headers.is_empty() => {
                    (State::HeaderContinuation, Incomplete)
                }
                _ if is_token(byte) => {
                    request
                        .headers
                        .push(Header::new(char::from(byte), String::new()));
                    (State::HeaderName, Incomplete)
                }
                _ => malformed(),
            },
            State::HeaderContinuation => match byte {
                b'\r' => (State::HeaderLineEnd, Incomplete),
                b' ' | b'\t' => (State::HeaderContinuation, Incomplete),
                _ => push_value(request, byte),
            },
            State::HeaderName => match byte {
                b':' => (State::SpaceBeforeValue, Incomplete),
                _ if is_token(byte) => {
                    if let Some(header) = request.headers.last_mut() {
                        header.name.push(char::from(byte));
                    }
                    (State::HeaderName, Incomplete)
                }
                _ => malformed(),
            },
            State::SpaceBeforeValue => match byte {
                b' ' => (State::HeaderValue, Incomplete),
                b'\r' => (State::HeaderLineEnd, Incomplete),
                _ => push_value(request, byte),
            },
            State::HeaderValue => match byte {
                b'\r' => (State::HeaderLineEnd, Incomplete),
                _ => push_value(request, byte),
            },
            State::HeaderLineEnd => literal(byte, b'\n', State::HeaderLineStart),
            State::FinalLineEnd => {
                if byte == b'\n' {
                    (State::Done, Complete)
                } else {
                    malformed()
                }
            }
            State::Done => (State::Done, Complete),
            State::Failed => malformed(),
        }
    }
}

const fn malformed() -> (State, ParseStatus) {
    (State::Failed, ParseStatus::Malformed)
}

fn literal(byte: u8, expected: u8, next: State) -> (State, ParseStatus) {
    if byte == expected {
        (next, ParseStatus::Incomplete)
    } else {
        malformed()
    }
}

fn accumulate(slot: &mut u32, byte: u8, state: State) -> (State, ParseStatus) {
    let Some(value) = digit(byte) else {
        return malformed();
    };
    match slot.checked_mul(10).and_then(|base| base.checked_add(value)) {
        Some(total) => {
            *slot = total;
            (state, ParseStatus::Incomplete)
        }
        None => malformed(),
    }
}

fn push_value(request: &mut Request, byte: u8) -> (State, ParseStatus) {
    if !is_char(byte) || is_ctl(byte) {
        return malformed();
    }
    match request.headers.last_mut() {
        Some(header) => {
            header.value.push(char::from(byte));
            (State::HeaderValue, ParseStatus::Incomplete)
        }
        None => malformed(),
    }
}

fn digit(byte: u8) -> Option<u32> {
    char::from(byte).to_digit(10)
}

const fn is_char(byte: u8) -> bool {
    byte.is_ascii()
}

const fn is_ctl(byte: u8) -> bool {
    byte <= 31 || byte == 127
}

const fn is_tspecial(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')'
            | b'<'
            | b'>'
            | b'@'
            | b','
            | b';'
            | b':'
            | b'\\'
            | b'"'
            | b'/'
            | b'['
            | b']'
            | b'?'
            | b'='
            | b'{'
            | b'}'
            | b' '
            | b'\t'
    )
}

const fn is_token(byte: u8) -> bool {
    is_char(byte) && !is_ctl(byte) && !is_tspecial(byte)
}
