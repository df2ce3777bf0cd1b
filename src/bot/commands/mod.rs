use teloxide::utils::command::BotCommands;

/// Commands registered with Telegram.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Shared calendar bot commands:")]
pub enum Command {
    /// List the commands.
    #[command(description = "Display this help message")]
    Help,
    /// Show the main menu.
    #[command(description = "Open the main menu")]
    Start,
    /// Abandon the pending prompt.
    #[command(description = "Cancel the current action")]
    Cancel,
}
