//! Tagged payload values.

use std::fmt;

/// Ordered list of values carried by commands and replies.
pub type Values = Vec<Value>;

/// Tagged payload used for command arguments and reply bodies.
///
/// Equality compares the tag first: an `Int(5)` never equals a `Float(5.0)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Signed integer.
    Int(i32),
    /// Single-precision float.
    Float(f32),
    /// UTF-8 text.
    Str(String),
    /// Ordered sequence of nested values.
    List(Values),
}

impl Value {
    /// Interprets the value as an integer.
    ///
    /// Floats truncate toward zero, strings parse their numeric content and
    /// lists (or unparsable strings) yield `0`.
    #[must_use]
    pub fn as_int(&self) -> i32 {
        match self {
            Self::Int(value) => *value,
            Self::Float(value) => truncate(*value),
            Self::Str(text) => parse_int(text),
            Self::List(_) => 0,
        }
    }

    /// Interprets the value as a float.
    ///
    /// Strings that do not hold a number and lists yield `0.0`.
    #[must_use]
    pub fn as_float(&self) -> f32 {
        match self {
            Self::Int(value) => widen(*value),
            Self::Float(value) => *value,
            Self::Str(text) => text.trim().parse::<f32>().unwrap_or(0.0),
            Self::List(_) => 0.0,
        }
    }

    /// Returns the textual form of the value (see the [`fmt::Display`] impl).
    #[must_use]
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    /// Returns the value as a list, wrapping scalars in a single-element list.
    #[must_use]
    pub fn as_values(&self) -> Values {
        match self {
            Self::List(values) => values.clone(),
            scalar => vec![scalar.clone()],
        }
    }

    /// Returns `true` for the list variant.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float to int conversion truncates by definition"
)]
fn truncate(value: f32) -> i32 {
    value.trunc() as i32
}

#[expect(
    clippy::cast_precision_loss,
    reason = "large integers lose precision the same way a float argument would"
)]
fn widen(value: i32) -> f32 {
    value as f32
}

fn parse_int(text: &str) -> i32 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i32>() {
        return value;
    }
    trimmed.parse::<f32>().map(truncate).unwrap_or(0)
}

impl fmt::Display for Value {
    /// Integers print in decimal, floats with six fractional digits, strings
    /// verbatim, and lists as their space-separated elements.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value:.6}"),
            Self::Str(text) => formatter.write_str(text),
            Self::List(values) => {
                let mut first = true;
                for value in values {
                    if !first {
                        formatter.write_str(" ")?;
                    }
                    first = false;
                    write!(formatter, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i32::try_from(value).unwrap_or(i32::MAX))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "values carry single-precision floats"
    )]
    fn from(value: f64) -> Self {
        Self::Float(value as f32)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<Values> for Value {
    fn from(values: Values) -> Self {
        Self::List(values)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::List(iter.into_iter().collect())
    }
}
