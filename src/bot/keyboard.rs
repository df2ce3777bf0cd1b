use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, User};

use crate::dialogue::{Actor, Response};

/// One button per row, in the order the engine offered them.
pub fn inline_keyboard(response: &Response) -> Option<InlineKeyboardMarkup> {
    if response.choices.is_empty() {
        return None;
    }

    let rows = response
        .choices
        .iter()
        .map(|choice| vec![InlineKeyboardButton::callback(choice.label.clone(), choice.token.clone())])
        .collect::<Vec<_>>();

    Some(InlineKeyboardMarkup::new(rows))
}

/// Telegram user ids are stable, first names are not; only the id is identity.
pub fn actor_from_user(user: &User) -> Actor {
    Actor::new(user.id.0.to_string(), user.first_name.clone())
}
