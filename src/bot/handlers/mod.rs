/// Inline keyboard presses
pub mod callback;
/// Commands and free text
pub mod message;

use std::sync::Arc;
use teloxide::{
    dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler},
    prelude::*,
    types::MessageId,
};

use crate::bot::commands::Command;
use crate::bot::keyboard::inline_keyboard;
use crate::calendar::CalendarResult;
use crate::dialogue::{DialogueEngine, Response};

/// Error type returned by every endpoint.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
/// Result type returned by every endpoint.
pub type HandlerResult = Result<(), HandlerError>;

/// Routes Telegram updates to the dialogue engine.
pub struct BotHandler {
    /// Shared by every branch of the schema.
    pub engine: Arc<DialogueEngine>,
}

impl BotHandler {
    /// Creates a handler around `engine`.
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self { engine }
    }

    /// Dispatcher tree: commands first, then free text, then callback queries.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let engine_commands = self.engine.clone();
        let engine_text = self.engine.clone();
        let engine_callback = self.engine.clone();

        dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let engine = engine_commands.clone();
                        async move { message::command_handler(bot, msg, cmd, engine).await }
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let engine = engine_text.clone();
                async move { message::text_handler(bot, msg, engine).await }
            }))
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let engine = engine_callback.clone();
                async move { callback::callback_handler(bot, q, engine).await }
            }))
    }
}

/// Sends the outcome of a dialogue turn, editing `editable` in place when given.
pub(crate) async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    editable: Option<MessageId>,
    outcome: CalendarResult<Response>,
) -> HandlerResult {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Dialogue turn failed in chat {}: {}", chat_id.0, e);
            Response::from_error(&e)
        }
    };
    let markup = inline_keyboard(&response);

    if let Some(message_id) = editable {
        let mut edit = bot.edit_message_text(chat_id, message_id, response.text.clone());
        if let Some(markup) = markup.clone() {
            edit = edit.reply_markup(markup);
        }
        match edit.await {
            Ok(_) => return Ok(()),
            Err(e) => tracing::debug!(
                "Could not edit message {} in chat {}: {}",
                message_id.0,
                chat_id.0,
                e
            ),
        }
    }

    let mut send = bot.send_message(chat_id, response.text);
    if let Some(markup) = markup {
        send = send.reply_markup(markup);
    }
    send.await?;
    Ok(())
}
