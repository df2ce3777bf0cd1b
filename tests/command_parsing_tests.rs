use shared_calendar_bot::bot::commands::Command;
use teloxide::utils::command::BotCommands;

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_help_command_parsing() {
        let result = Command::parse("/help", "testbot");
        assert_eq!(result.unwrap(), Command::Help);
    }

    #[test]
    fn test_start_command_parsing() {
        let result = Command::parse("/start", "testbot");
        assert_eq!(result.unwrap(), Command::Start);
    }

    #[test]
    fn test_cancel_command_parsing() {
        let result = Command::parse("/cancel", "testbot");
        assert_eq!(result.unwrap(), Command::Cancel);
    }

    #[test]
    fn test_command_addressed_to_bot() {
        let result = Command::parse("/start@testbot", "testbot");
        assert_eq!(result.unwrap(), Command::Start);
    }

    #[test]
    fn test_unknown_commands_are_rejected() {
        assert!(Command::parse("/schedule", "testbot").is_err());
        assert!(Command::parse("/promote 42", "testbot").is_err());
        assert!(Command::parse("start", "testbot").is_err());
    }

    #[test]
    fn test_descriptions_list_every_command() {
        let descriptions = Command::descriptions().to_string();
        for command in ["/help", "/start", "/cancel"] {
            assert!(descriptions.contains(command), "missing {command}");
        }
    }
}
