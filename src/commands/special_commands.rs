//! Special commands parser for interactive fortune sessions
//!
//! Commands are prefixed with `/` and are case-insensitive. Anything else is
//! treated as a sign name or birth date, depending on the current mode.

use crate::fortune::SelectionMode;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during a session
///
/// These commands change the session state or print information; they never
/// reach the text generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch how the next inputs are interpreted
    SwitchMode(SelectionMode),

    /// List the twelve signs with their date ranges
    ListSigns,

    /// Print the whole transcript again
    ShowHistory,

    /// Show provider, model, mode, and transcript size
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not
/// a valid command, `CommandError::MissingArgument` for a bare `/mode`, and
/// `CommandError::UnsupportedArgument` for an unknown mode.
///
/// # Examples
///
/// ```
/// use zodiac_fortune::commands::special_commands::{parse_special_command, SpecialCommand};
/// use zodiac_fortune::fortune::SelectionMode;
///
/// let cmd = parse_special_command("/birth").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchMode(SelectionMode::ByBirthDate));
///
/// let cmd = parse_special_command("사자자리").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/tarot").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        "/sign" | "/zodiac" => Ok(SpecialCommand::SwitchMode(SelectionMode::BySign)),
        "/birth" | "/date" => Ok(SpecialCommand::SwitchMode(SelectionMode::ByBirthDate)),

        "/mode" => Err(CommandError::MissingArgument {
            command: "/mode".to_string(),
            usage: "/mode <sign|birthdate>".to_string(),
        }),
        input if input.starts_with("/mode ") => {
            let arg = input[6..].trim();
            SelectionMode::parse_str(arg)
                .map(SpecialCommand::SwitchMode)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/mode".to_string(),
                    arg: arg.to_string(),
                })
        }

        "/signs" | "/list" => Ok(SpecialCommand::ListSigns),
        "/history" => Ok(SpecialCommand::ShowHistory),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        input => {
            let cmd = input.split_whitespace().next().unwrap_or(input);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands
================

SELECTION MODE:
  /sign           - Enter a zodiac sign (별자리로 보기)
  /birth          - Enter a birth date, YYYY-MM-DD (생년월일로 보기)
  /mode <sign|birthdate> - Same as the two commands above

INFORMATION:
  /signs          - List the twelve signs and their dates
  /history        - Print the conversation so far
  /status         - Show provider, model, and current mode
  /help           - Show this help message

SESSION CONTROL:
  /exit, exit     - Leave the session
  /quit, quit     - Same as exit

Anything else is read as a sign name (사자자리, Leo) or a birth date,
depending on the current mode.
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch_to_sign() {
        assert_eq!(
            parse_special_command("/sign").unwrap(),
            SpecialCommand::SwitchMode(SelectionMode::BySign)
        );
        assert_eq!(
            parse_special_command("/mode sign").unwrap(),
            SpecialCommand::SwitchMode(SelectionMode::BySign)
        );
    }

    #[test]
    fn test_parse_switch_to_birth_date() {
        assert_eq!(
            parse_special_command("/birth").unwrap(),
            SpecialCommand::SwitchMode(SelectionMode::ByBirthDate)
        );
        assert_eq!(
            parse_special_command("/mode birthdate").unwrap(),
            SpecialCommand::SwitchMode(SelectionMode::ByBirthDate)
        );
    }

    #[test]
    fn test_parse_mode_without_argument() {
        assert_eq!(
            parse_special_command("/mode").unwrap_err(),
            CommandError::MissingArgument {
                command: "/mode".to_string(),
                usage: "/mode <sign|birthdate>".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_mode_with_unknown_argument() {
        let err = parse_special_command("/mode tarot").unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedArgument { ref arg, .. } if arg == "tarot"));
    }

    #[test]
    fn test_parse_information_commands() {
        assert_eq!(
            parse_special_command("/signs").unwrap(),
            SpecialCommand::ListSigns
        );
        assert_eq!(
            parse_special_command("/history").unwrap(),
            SpecialCommand::ShowHistory
        );
        assert_eq!(
            parse_special_command("/status").unwrap(),
            SpecialCommand::ShowStatus
        );
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_exit_variants() {
        for input in ["exit", "QUIT", "/exit", "/quit"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_parse_case_insensitive_with_whitespace() {
        assert_eq!(
            parse_special_command("  /HELP  ").unwrap(),
            SpecialCommand::Help
        );
    }

    #[test]
    fn test_regular_input_returns_none() {
        assert_eq!(
            parse_special_command("1990-05-21").unwrap(),
            SpecialCommand::None
        );
        assert_eq!(parse_special_command("Leo").unwrap(), SpecialCommand::None);
        assert_eq!(parse_special_command("").unwrap(), SpecialCommand::None);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_special_command("/tarot cards").unwrap_err(),
            CommandError::UnknownCommand("/tarot".to_string())
        );
    }

    #[test]
    fn test_error_display_mentions_help() {
        let err = CommandError::UnknownCommand("/x".to_string());
        assert!(err.to_string().contains("/help"));
    }
}
