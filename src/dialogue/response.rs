use crate::calendar::{CalendarError, ErrorKind};
use crate::dialogue::menu::MenuChoice;

/// Tone of a response, shown as a leading emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    /// A change was saved.
    Success,
    /// Asks for confirmation.
    Warning,
    /// The turn failed.
    Error,
    /// Nothing changed.
    Info,
    /// Waiting for text.
    Prompt,
}

impl FeedbackType {
    fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Prompt => "✏️",
        }
    }
}

/// A button offered to the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Button text.
    pub label: String,
    /// Menu token sent back when pressed.
    pub token: String,
}

impl Choice {
    /// A button that sends `choice` back.
    pub fn new(label: impl Into<String>, choice: MenuChoice) -> Self {
        Self {
            label: label.into(),
            token: choice.to_string(),
        }
    }
}

/// What the transport should render after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Message body.
    pub text: String,
    /// Buttons, in display order.
    pub choices: Vec<Choice>,
    /// Set when the turn ended in a recovered error.
    pub error: Option<ErrorKind>,
}

impl Response {
    /// Plain response with no buttons.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: Vec::new(),
            error: None,
        }
    }

    /// Response prefixed with the feedback emoji.
    pub fn feedback(feedback_type: FeedbackType, message: &str) -> Self {
        Self::new(format!("{} {}", feedback_type.emoji(), message))
    }

    /// User-facing rendering of a recovered error.
    pub fn from_error(err: &CalendarError) -> Self {
        let mut response = Self::feedback(FeedbackType::Error, &err.user_message());
        response.error = Some(err.kind());
        response
    }

    /// Appends one button.
    pub fn with_choice(mut self, label: impl Into<String>, choice: MenuChoice) -> Self {
        self.choices.push(Choice::new(label, choice));
        self
    }

    /// Appends several buttons.
    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }

    /// Whether a button carries `token`.
    pub fn has_token(&self, token: &str) -> bool {
        self.choices.iter().any(|choice| choice.token == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_type_emojis() {
        assert_eq!(FeedbackType::Success.emoji(), "✅");
        assert_eq!(FeedbackType::Warning.emoji(), "⚠️");
        assert_eq!(FeedbackType::Error.emoji(), "❌");
        assert_eq!(FeedbackType::Info.emoji(), "ℹ️");
        assert_eq!(FeedbackType::Prompt.emoji(), "✏️");
    }

    #[test]
    fn test_error_response_carries_kind() {
        let response = Response::from_error(&CalendarError::Permission("owner only".into()));
        assert_eq!(response.error, Some(ErrorKind::Permission));
        assert!(response.text.starts_with("❌"));
        assert!(response.choices.is_empty());
    }
}
