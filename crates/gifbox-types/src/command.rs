//! Commands understood by the application loop.

use strum::{Display, EnumString};

use crate::value::{Value, Values};

/// Identifier of a command the application loop can execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum CommandId {
    /// No command; signals an empty queue or an unset command.
    #[default]
    None,
    /// Start sending the composited output.
    Start,
    /// Stop recording and sending output.
    Stop,
    /// Begin recording the composited output.
    Record,
    /// Leave the application loop.
    Quit,
    /// Switch the pre-rendered content played behind the subject.
    SelectContent,
    /// Ask for the name of the last finished recording.
    QueryRecordName,
    /// Ask whether a recording is in progress.
    QueryRecordingStatus,
}

/// A decoded request ready for the application loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    id: CommandId,
    args: Values,
}

impl Command {
    /// Builds a command from its identifier and argument tokens.
    #[must_use]
    pub const fn new(id: CommandId, args: Values) -> Self {
        Self { id, args }
    }

    /// Builds the empty command.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(CommandId::None, Vec::new())
    }

    /// Command identifier.
    #[must_use]
    pub const fn id(&self) -> CommandId {
        self.id
    }

    /// Argument tokens in request order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Returns `true` when this is the empty command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.id, CommandId::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(CommandId::SelectContent, "select-content")]
    #[case(CommandId::QueryRecordingStatus, "query-recording-status")]
    #[case(CommandId::None, "none")]
    fn identifiers_display_in_kebab_case(#[case] id: CommandId, #[case] text: &str) {
        assert_eq!(id.to_string(), text);
        assert_eq!(CommandId::from_str(text).ok(), Some(id));
    }

    #[test]
    fn default_command_is_none() {
        let command = Command::default();
        assert!(command.is_none());
        assert!(command.args().is_empty());
        assert_eq!(command, Command::none());
    }

    #[test]
    fn arguments_keep_order() {
        let command = Command::new(
            CommandId::SelectContent,
            vec![Value::from("clip"), Value::from("30")],
        );
        assert_eq!(command.id(), CommandId::SelectContent);
        assert_eq!(command.arg(1), Some(&Value::from("30")));
        assert_eq!(command.arg(2), None);
    }
}
