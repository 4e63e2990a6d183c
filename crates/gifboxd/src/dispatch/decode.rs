//! Request target decoding.
//!
//! The whole target is percent-decoded, its command is chosen by path
//! prefix, and its argument tokens come from splitting the decoded target on
//! `&` and `=`. The first token is therefore the path itself (plus anything
//! before the first separator), and key/value pairing is not preserved:
//! `/setFilm?name=clip` yields `["/setFilm?name", "clip"]`.

use gifbox_types::{Command, CommandId, Value};

use super::errors::{DecodeError, DispatchError};

/// Known path prefixes, matched case-sensitively against the decoded target.
const ROUTES: &[(&str, CommandId)] = &[
    ("/start", CommandId::Start),
    ("/record", CommandId::Record),
    ("/stop", CommandId::Stop),
    ("/quit", CommandId::Quit),
    ("/setFilm", CommandId::SelectContent),
    ("/getRecordName", CommandId::QueryRecordName),
    ("/isRecording", CommandId::QueryRecordingStatus),
];

/// Decodes `%XX` escapes and `+` (as a space).
///
/// # Errors
///
/// Returns [`DecodeError`] for a truncated or non-hex escape, or when the
/// decoded bytes are not UTF-8.
pub fn percent_decode(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'%' => {
                let (Some(&high), Some(&low)) = (bytes.get(index + 1), bytes.get(index + 2))
                else {
                    return Err(DecodeError::TruncatedEscape { offset: index });
                };
                let value = hex_pair(high, low)
                    .ok_or(DecodeError::InvalidEscape { offset: index })?;
                decoded.push(value);
                index += 3;
            }
            b'+' => {
                decoded.push(b' ');
                index += 1;
            }
            other => {
                decoded.push(other);
                index += 1;
            }
        }
    }
    Ok(String::from_utf8(decoded)?)
}

fn hex_pair(high: u8, low: u8) -> Option<u8> {
    let high = char::from(high).to_digit(16)?;
    let low = char::from(low).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}

/// Splits on `&` and `=`, dropping empty tokens.
#[must_use]
pub fn tokenize(decoded: &str) -> Vec<String> {
    decoded
        .split(['&', '='])
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Resolves the command for a decoded target, if any prefix matches.
#[must_use]
pub fn route(decoded: &str) -> Option<CommandId> {
    ROUTES
        .iter()
        .find(|(prefix, _)| decoded.starts_with(prefix))
        .map(|(_, id)| *id)
}

/// Turns a raw request target into a command.
///
/// # Errors
///
/// Returns [`DispatchError::Decode`] for bad escapes and
/// [`DispatchError::UnknownPath`] when no route matches.
pub fn decode_target(target: &str) -> Result<Command, DispatchError> {
    let decoded = percent_decode(target)?;
    let Some(id) = route(&decoded) else {
        return Err(DispatchError::UnknownPath { path: decoded });
    };
    let args = tokenize(&decoded).into_iter().map(Value::from).collect();
    Ok(Command::new(id, args))
}
