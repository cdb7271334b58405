//! Parsing of prompt input lines.

/// What the user asked for on one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Any other non-empty line is sent as a message
    Message(String),
    /// Blank line
    Empty,
    /// Slash command that could not be understood
    Invalid(String),
}

impl Command {
    /// Parse one prompt line. Lines not starting with `/` are messages and
    /// keep their original whitespace.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, argument) = match rest.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (rest, ""),
        };
        match (name, argument) {
            ("join", "") => Self::Invalid("usage: /join <room>".to_string()),
            ("join", room) => Self::Join(room.to_string()),
            ("leave", _) => Self::Leave,
            ("quit" | "exit", _) => Self::Quit,
            (other, _) => Self::Invalid(format!("unknown command: /{other}")),
        }
    }
}
