use chrono::NaiveDate;

use crate::calendar::{ActorId, CalendarError, CalendarResult};
use crate::utils::datetime::parse_event_date;

/// Longest accepted event title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;
/// Longest accepted comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;
/// Longest accepted actor id.
pub const MAX_ACTOR_ID_LENGTH: usize = 64;

/// Words accepted as "yes" when confirming a removal.
pub const AFFIRMATIVE_TOKENS: [&str; 2] = ["да", "yes"];

fn invalid(message: impl Into<String>) -> CalendarError {
    CalendarError::Validation(message.into())
}

/// Trims a title and rejects blank or overlong ones.
pub fn validate_event_title(title: &str) -> CalendarResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(invalid("event title cannot be empty"));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(invalid(format!(
            "event title cannot be longer than {MAX_TITLE_LENGTH} characters"
        )));
    }

    if title.contains('\n') || title.contains('\r') {
        return Err(invalid("event title cannot contain line breaks"));
    }

    Ok(title.to_string())
}

/// Parses `"<date> <title>"` as typed when adding or editing an event.
pub fn parse_event_input(input: &str) -> CalendarResult<(NaiveDate, String)> {
    let input = input.trim();

    let (date, title) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| invalid("expected '<YYYY-MM-DD> <title>'"))?;

    let date = parse_event_date(date)
        .ok_or_else(|| invalid(format!("'{date}' is not a date, use YYYY-MM-DD")))?;
    let title = validate_event_title(title)?;

    Ok((date, title))
}

/// Trims a comment and rejects blank or overlong ones.
pub fn validate_comment(text: &str) -> CalendarResult<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(invalid("comment cannot be empty"));
    }

    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(invalid(format!(
            "comment cannot be longer than {MAX_COMMENT_LENGTH} characters"
        )));
    }

    Ok(text.to_string())
}

/// A promotion target is a single token naming an actor.
pub fn validate_actor_id(input: &str) -> CalendarResult<ActorId> {
    let input = input.trim();

    if input.is_empty() {
        return Err(invalid("user id cannot be empty"));
    }

    if input.chars().any(char::is_whitespace) {
        return Err(invalid("user id cannot contain spaces"));
    }

    if input.chars().count() > MAX_ACTOR_ID_LENGTH {
        return Err(invalid("user id is too long"));
    }

    Ok(ActorId::new(input))
}

/// Whether the reply confirms a removal.
pub fn is_affirmative(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    AFFIRMATIVE_TOKENS.iter().any(|token| *token == input)
}
