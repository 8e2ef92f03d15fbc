//! Special commands parser for the interactive chat
//!
//! Special commands are prefixed with `/` and are case-insensitive (their
//! arguments keep their case). They act on the terminal session instead of
//! being classified as chat messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Upload a source and a sink document from disk
    Upload { source: PathBuf, sink: PathBuf },

    /// Show the session status and what has been uploaded
    ShowStatus,

    /// Print the current draft
    ShowDraft,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; the input is a chat message
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, and `CommandError::MissingArgument` if `/upload` is
/// not given two paths.
///
/// # Examples
///
/// ```
/// use schemabridge::commands::special_commands::{parse_special_command, SpecialCommand};
/// use std::path::PathBuf;
///
/// let cmd = parse_special_command("/upload users.json Contacts.json").unwrap();
/// assert_eq!(
///     cmd,
///     SpecialCommand::Upload {
///         source: PathBuf::from("users.json"),
///         sink: PathBuf::from("Contacts.json"),
///     }
/// );
///
/// assert_eq!(parse_special_command("looks good").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default().to_lowercase();

    match command.as_str() {
        "/upload" => {
            let args: Vec<&str> = parts.collect();
            match args.as_slice() {
                [source, sink] => Ok(SpecialCommand::Upload {
                    source: PathBuf::from(source),
                    sink: PathBuf::from(sink),
                }),
                _ => Err(CommandError::MissingArgument {
                    command: "/upload".to_string(),
                    usage: "/upload <source.json> <sink.json>".to_string(),
                }),
            }
        }
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/draft" => Ok(SpecialCommand::ShowDraft),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Display help information for the interactive chat
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

DOCUMENTS:
  /upload <source> <sink> - Upload two JSON files and create a draft

SESSION INFORMATION:
  /status         - Show draft status and uploaded schemas
  /draft          - Print the current draft
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  /exit, exit     - Exit interactive mode
  /quit, quit     - Same as exit

NOTES:
  - Commands are case-insensitive
  - Any other text is a chat message: state your goal, give feedback on
    the draft, or approve it with "ok", "proceed", "submit" or "looks good"
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_text_is_not_a_command() {
        assert_eq!(parse_special_command("convert my file").unwrap(), SpecialCommand::None);
        assert_eq!(parse_special_command("   ").unwrap(), SpecialCommand::None);
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        assert_eq!(parse_special_command("/STATUS").unwrap(), SpecialCommand::ShowStatus);
        assert_eq!(parse_special_command("/Draft").unwrap(), SpecialCommand::ShowDraft);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("QUIT").unwrap(), SpecialCommand::Exit);
        assert_eq!(parse_special_command("/exit").unwrap(), SpecialCommand::Exit);
    }

    #[test]
    fn test_upload_keeps_path_case() {
        let cmd = parse_special_command("/UPLOAD Data/In.json Out.json").unwrap();
        assert_eq!(
            cmd,
            SpecialCommand::Upload {
                source: PathBuf::from("Data/In.json"),
                sink: PathBuf::from("Out.json"),
            }
        );
    }

    #[test]
    fn test_upload_requires_two_paths() {
        for input in ["/upload", "/upload a.json", "/upload a.json b.json c.json"] {
            assert!(matches!(
                parse_special_command(input),
                Err(CommandError::MissingArgument { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_special_command("/mode write").unwrap_err();
        assert_eq!(err, CommandError::UnknownCommand("/mode write".to_string()));
        assert!(err.to_string().contains("/help"));
    }
}
