use async_trait::async_trait;

use crate::calendar::{ActorId, CalendarResult, Event, EventId, EventPatch, NewEvent};

/// Owns event records. No business rules beyond record shape.
///
/// Implementations serialize mutations against each other and return `list`
/// results from a single consistent snapshot, in insertion order.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Stores a new event and returns its freshly assigned id.
    async fn create(&self, event: NewEvent) -> CalendarResult<EventId>;

    /// Fails with `NotFound` when the id is unknown.
    async fn get(&self, id: &EventId) -> CalendarResult<Event>;

    /// Every event, with comments, in insertion order.
    async fn list(&self) -> CalendarResult<Vec<Event>>;

    /// Applies `patch` and returns the updated event.
    async fn update(&self, id: &EventId, patch: EventPatch) -> CalendarResult<Event>;

    /// Removes the event and its comments.
    async fn delete(&self, id: &EventId) -> CalendarResult<()>;
}

/// Set of actors with override rights. Membership only grows.
#[async_trait]
pub trait ModeratorRegistry: Send + Sync {
    /// Whether `actor` has override rights.
    async fn is_moderator(&self, actor: &ActorId) -> CalendarResult<bool>;

    /// Returns `true` if the actor was not a moderator before.
    async fn promote(&self, actor: &ActorId) -> CalendarResult<bool>;

    /// All moderators, sorted by id.
    async fn list(&self) -> CalendarResult<Vec<ActorId>>;
}
