//! Stdout line protocol definitions
//!
//! Every line is plain text terminated by `\n`. Only `COMMAND:left` and
//! `COMMAND:right` carry meaning; `ERROR: <message>` lines report a failed
//! event and anything else is informational.

use crate::hotkey::names;

/// Prefix shared by both command tokens
pub const COMMAND_PREFIX: &str = "COMMAND:";

/// Prefix of error lines
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Banner printed once at startup when tracing is enabled
pub const BANNER: &str = "hotkey-nav started";

/// Navigation command sent to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
}

impl Command {
    /// Map an arrow key name to its command
    pub fn for_key(name: &str) -> Option<Self> {
        match name {
            names::RIGHT => Some(Command::Right),
            names::LEFT => Some(Command::Left),
            _ => None,
        }
    }

    pub fn direction(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
        }
    }

    /// The token as written on stdout, without the newline
    pub fn token(&self) -> &'static str {
        match self {
            Command::Left => "COMMAND:left",
            Command::Right => "COMMAND:right",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// A stdout line as classified by a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// `COMMAND:left` or `COMMAND:right`
    Command(Command),
    /// `ERROR: <message>`
    Error(String),
    /// Anything else, to be ignored or logged
    Other(String),
}

impl OutputLine {
    /// Classify one line read from the daemon's stdout
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(direction) = line.strip_prefix(COMMAND_PREFIX) {
            match direction {
                "left" => return OutputLine::Command(Command::Left),
                "right" => return OutputLine::Command(Command::Right),
                _ => {}
            }
        }

        if let Some(message) = line.strip_prefix(ERROR_PREFIX) {
            return OutputLine::Error(message.to_string());
        }

        OutputLine::Other(line.to_string())
    }

    pub fn command(&self) -> Option<Command> {
        match self {
            OutputLine::Command(command) => Some(*command),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_key() {
        assert_eq!(Command::for_key("right"), Some(Command::Right));
        assert_eq!(Command::for_key("left"), Some(Command::Left));
        assert_eq!(Command::for_key("up"), None);
        assert_eq!(Command::for_key("Right"), None);
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Command::Right.to_string(), "COMMAND:right");
        assert_eq!(Command::Left.token(), "COMMAND:left");
        assert_eq!(Command::Left.direction(), "left");
    }

    #[test]
    fn test_parse_command_lines() {
        assert_eq!(
            OutputLine::parse("COMMAND:right\n"),
            OutputLine::Command(Command::Right)
        );
        assert_eq!(
            OutputLine::parse("COMMAND:left\r\n").command(),
            Some(Command::Left)
        );
    }

    #[test]
    fn test_parse_non_command_lines() {
        assert_eq!(
            OutputLine::parse("ERROR: key state table is poisoned"),
            OutputLine::Error("key state table is poisoned".to_string())
        );
        assert_eq!(
            OutputLine::parse(BANNER),
            OutputLine::Other(BANNER.to_string())
        );
        assert_eq!(OutputLine::parse("COMMAND:up").command(), None);
        assert_eq!(OutputLine::parse("COMMAND:right ").command(), None);
    }
}
