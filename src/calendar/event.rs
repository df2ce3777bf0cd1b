use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::CalendarError;
use crate::utils::datetime::parse_event_date;

/// Stable handle of the person driving a dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    /// Wraps a transport-provided id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Repository-assigned event identifier. Never a list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| CalendarError::Validation(format!("'{s}' is not an event id")))
    }
}

/// Who may see an event besides its owner and moderators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Everyone.
    Public,
    /// Owner and moderators only.
    Private,
}

impl Visibility {
    /// Lowercase name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    /// Colour marker used in list and detail views.
    pub fn marker(&self) -> &'static str {
        match self {
            Visibility::Public => "🔵",
            Visibility::Private => "🟣",
        }
    }
}

impl FromStr for Visibility {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(CalendarError::Validation(format!("unknown visibility '{other}'"))),
        }
    }
}

/// A note left on an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Who wrote it.
    pub author: ActorId,
    /// Author's display name when the comment was written.
    pub author_name: String,
    /// Comment body, already trimmed.
    pub text: String,
}

/// A calendar entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable id assigned on creation.
    pub id: EventId,
    /// Creator; only the owner and moderators may change the event.
    pub owner: ActorId,
    /// Owner's display name at creation time.
    pub owner_name: String,
    /// Short human-readable title.
    pub title: String,
    /// Canonical `YYYY-MM-DD`; legacy rows may hold anything.
    pub date: String,
    /// Public or private.
    pub visibility: Visibility,
    /// Comments in the order they were added.
    pub comments: Vec<Comment>,
    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// The stored date, or `None` when it does not parse.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_event_date(&self.date)
    }

    /// One-line summary used for list buttons.
    pub fn summary(&self) -> String {
        format!(
            "{} {} — {} ({})",
            self.visibility.marker(),
            self.date,
            self.title,
            self.owner_name
        )
    }
}

/// Fields supplied by the caller when creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Creator of the event.
    pub owner: ActorId,
    /// Creator's display name.
    pub owner_name: String,
    /// Title; must not be blank.
    pub title: String,
    /// Canonical `YYYY-MM-DD` date.
    pub date: String,
    /// Public or private.
    pub visibility: Visibility,
}

impl NewEvent {
    /// Turns the request into a full record with a fresh id.
    pub fn into_event(self) -> Result<Event, CalendarError> {
        if self.title.trim().is_empty() {
            return Err(CalendarError::Validation("event title cannot be empty".to_string()));
        }
        Ok(Event {
            id: EventId::generate(),
            owner: self.owner,
            owner_name: self.owner_name,
            title: self.title,
            date: self.date,
            visibility: self.visibility,
            comments: Vec::new(),
            created_at: Utc::now(),
        })
    }
}

/// Partial update applied by [`crate::database::EventRepository::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    /// New date, if rescheduling.
    pub date: Option<String>,
    /// New title, if renaming.
    pub title: Option<String>,
    /// Comment to append.
    pub comment: Option<Comment>,
}

impl EventPatch {
    /// Replaces date and title.
    pub fn reschedule(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            title: Some(title.into()),
            comment: None,
        }
    }

    /// Appends a comment.
    pub fn comment(comment: Comment) -> Self {
        Self {
            comment: Some(comment),
            ..Self::default()
        }
    }

    /// Rejects blank titles and comments before anything is written.
    pub fn validate(&self) -> Result<(), CalendarError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CalendarError::Validation("event title cannot be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Applies the patch in place. Comments are only ever appended.
    pub fn apply(self, event: &mut Event) {
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(comment) = self.comment {
            event.comments.push(comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event(title: &str) -> NewEvent {
        NewEvent {
            owner: ActorId::new("1"),
            owner_name: "Alice".to_string(),
            title: title.to_string(),
            date: "2025-06-01".to_string(),
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn test_visibility_parse_rejects_unknown_values() {
        assert_eq!("PUBLIC".parse::<Visibility>().unwrap(), Visibility::Public);
        assert_eq!(" private ".parse::<Visibility>().unwrap(), Visibility::Private);
        assert!("friends".parse::<Visibility>().is_err());
        assert!("".parse::<Visibility>().is_err());
    }

    #[test]
    fn test_event_id_parse() {
        let id = EventId::generate();
        assert_eq!(id.to_string().parse::<EventId>().unwrap(), id);
        assert!("3".parse::<EventId>().is_err());
    }

    #[test]
    fn test_into_event_requires_title() {
        assert!(new_event("   ").into_event().is_err());
        let event = new_event("Sync").into_event().unwrap();
        assert!(event.comments.is_empty());
        assert_eq!(event.summary(), "🔵 2025-06-01 — Sync (Alice)");
    }

    #[test]
    fn test_patch_appends_comments_in_order() {
        let mut event = new_event("Sync").into_event().unwrap();
        for text in ["first", "second"] {
            EventPatch::comment(Comment {
                author: ActorId::new("2"),
                author_name: "Bob".to_string(),
                text: text.to_string(),
            })
            .apply(&mut event);
        }
        let texts: Vec<_> = event.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(event.title, "Sync");
    }

    #[test]
    fn test_unparsable_date_is_kept_verbatim() {
        let mut event = new_event("Sync").into_event().unwrap();
        event.date = "someday".to_string();
        assert_eq!(event.parsed_date(), None);
    }
}
