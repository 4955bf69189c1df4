//! Prefix command parsing.

/// Commands recognized in channel messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Evaluate the replied-to message.
    Remove,
    /// Prefixed word that is not a known command.
    Unknown(String),
}

/// Parse `content` as a prefixed command.
///
/// Returns `None` when the message does not start with `prefix` or has no
/// command name after it.
pub fn parse_command(prefix: &str, content: &str) -> Option<Command> {
    if prefix.is_empty() {
        return None;
    }
    let rest = content.trim_start().strip_prefix(prefix)?;
    let name = rest.split_whitespace().next()?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(match name {
        "remove" => Command::Remove,
        other => Command::Unknown(other.to_string()),
    })
}

/// Reply for a prefixed command that does not exist.
pub fn unknown_command_message(prefix: &str) -> String {
    format!("Command not found. Available commands: `{prefix}remove`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_command() {
        assert_eq!(parse_command("!", "!remove"), Some(Command::Remove));
        assert_eq!(parse_command("!", "  !remove please"), Some(Command::Remove));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("!", "!ban someone"),
            Some(Command::Unknown("ban".into()))
        );
    }

    #[test]
    fn plain_text_ignored() {
        assert_eq!(parse_command("!", "hello there"), None);
        assert_eq!(parse_command("!", "wow!remove"), None);
    }

    #[test]
    fn bare_prefix_ignored() {
        assert_eq!(parse_command("!", "!"), None);
        assert_eq!(parse_command("!", "! remove"), None);
    }

    #[test]
    fn multi_char_prefix() {
        assert_eq!(parse_command("w!", "w!remove"), Some(Command::Remove));
        assert_eq!(parse_command("w!", "!remove"), None);
    }

    #[test]
    fn command_name_is_case_sensitive() {
        assert_eq!(
            parse_command("!", "!Remove"),
            Some(Command::Unknown("Remove".into()))
        );
    }

    #[test]
    fn unknown_message_uses_prefix() {
        assert_eq!(
            unknown_command_message("?"),
            "Command not found. Available commands: `?remove`"
        );
    }
}
