use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::{deliver, HandlerResult};
use crate::bot::commands::Command;
use crate::bot::keyboard::actor_from_user;
use crate::dialogue::{Action, DialogueEngine, MenuChoice};

/// Handles `/help`, `/start` and `/cancel`.
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    engine: Arc<DialogueEngine>,
) -> HandlerResult {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let actor = actor_from_user(user);

    let action = match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
            return Ok(());
        }
        Command::Start => Action::menu(actor, MenuChoice::MainMenu.to_string()),
        Command::Cancel => Action::cancel(actor),
    };

    let outcome = engine.handle(action).await;
    deliver(&bot, msg.chat.id, None, outcome).await
}

/// Free text goes to whatever the actor's dialogue is waiting for.
pub async fn text_handler(bot: Bot, msg: Message, engine: Arc<DialogueEngine>) -> HandlerResult {
    let (Some(text), Some(user)) = (msg.text(), msg.from()) else {
        return Ok(());
    };

    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        bot.send_message(
            msg.chat.id,
            format!("❌ Unknown command: {command}\n\n💡 Use /help to see all available commands."),
        )
        .await?;
        return Ok(());
    }

    let outcome = engine.handle(Action::text(actor_from_user(user), text)).await;
    deliver(&bot, msg.chat.id, None, outcome).await
}
