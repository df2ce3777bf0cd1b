use std::sync::Arc;
use teloxide::prelude::*;

use super::{deliver, HandlerResult};
use crate::bot::keyboard::actor_from_user;
use crate::dialogue::{Action, DialogueEngine};

/// Runs a pressed inline button as a menu action and edits the message in place.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    engine: Arc<DialogueEngine>,
) -> HandlerResult {
    let actor = actor_from_user(&q.from);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id)
            .text("Invalid callback data format")
            .await?;
        return Ok(());
    };

    tracing::info!(
        "Callback received: '{}' from user {} ({})",
        data,
        actor.display_name,
        actor.id
    );
    bot.answer_callback_query(q.id.clone()).await?;

    let outcome = engine.handle(Action::menu(actor, data)).await;

    match q.message {
        Some(message) => deliver(&bot, message.chat.id, Some(message.id), outcome).await,
        // Inline-mode buttons have no message to edit; answer in private chat.
        None => deliver(&bot, ChatId(q.from.id.0 as i64), None, outcome).await,
    }
}
