use crate::calendar::ActorId;

/// The person behind a turn, as resolved by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Identity used for every permission check.
    pub id: ActorId,
    /// Shown next to events and comments; never used for authorization.
    pub display_name: String,
}

impl Actor {
    /// Builds an actor from a raw id and a display name.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(id),
            display_name: display_name.into(),
        }
    }
}

/// What the actor did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    /// A menu token, e.g. the callback data of a pressed button.
    MenuSelect(String),
    /// Free text typed in reply to a prompt.
    TextInput(String),
    /// Explicit abort of whatever is pending.
    Cancel,
}

/// One inbound dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Who acted.
    pub actor: Actor,
    /// What they did.
    pub kind: ActionKind,
}

impl Action {
    /// A menu selection.
    pub fn menu(actor: Actor, token: impl Into<String>) -> Self {
        Self {
            actor,
            kind: ActionKind::MenuSelect(token.into()),
        }
    }

    /// Free text input.
    pub fn text(actor: Actor, text: impl Into<String>) -> Self {
        Self {
            actor,
            kind: ActionKind::TextInput(text.into()),
        }
    }

    /// A cancel request.
    pub fn cancel(actor: Actor) -> Self {
        Self {
            actor,
            kind: ActionKind::Cancel,
        }
    }

    /// Token or text carried by the action.
    pub fn payload(&self) -> &str {
        match &self.kind {
            ActionKind::MenuSelect(token) => token,
            ActionKind::TextInput(text) => text,
            ActionKind::Cancel => "",
        }
    }

    /// Short name for log lines.
    pub fn describe(&self) -> String {
        match &self.kind {
            ActionKind::MenuSelect(token) => format!("menu:{token}"),
            ActionKind::TextInput(_) => "text".to_string(),
            ActionKind::Cancel => "cancel".to_string(),
        }
    }
}
