use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

use super::repository::{EventRepository, ModeratorRegistry};
use crate::calendar::{ActorId, CalendarError, CalendarResult, Event, EventId, EventPatch, NewEvent};

fn not_found(id: &EventId) -> CalendarError {
    CalendarError::NotFound(format!("event {id}"))
}

/// Process-local event store, used by tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventRepository {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: NewEvent) -> CalendarResult<EventId> {
        let event = event.into_event()?;
        let id = event.id;
        self.events.write().await.push(event);
        Ok(id)
    }

    async fn get(&self, id: &EventId) -> CalendarResult<Event> {
        self.events
            .read()
            .await
            .iter()
            .find(|event| event.id == *id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self) -> CalendarResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> CalendarResult<Event> {
        patch.validate()?;
        let mut events = self.events.write().await;
        let event = events
            .iter_mut()
            .find(|event| event.id == *id)
            .ok_or_else(|| not_found(id))?;
        patch.apply(event);
        Ok(event.clone())
    }

    async fn delete(&self, id: &EventId) -> CalendarResult<()> {
        let mut events = self.events.write().await;
        let position = events
            .iter()
            .position(|event| event.id == *id)
            .ok_or_else(|| not_found(id))?;
        events.remove(position);
        Ok(())
    }
}

/// Process-local moderator registry.
#[derive(Default)]
pub struct InMemoryModeratorRegistry {
    members: RwLock<BTreeSet<ActorId>>,
}

impl InMemoryModeratorRegistry {
    /// A registry with no moderators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated by the operator.
    pub fn with_moderators(moderators: impl IntoIterator<Item = ActorId>) -> Self {
        Self {
            members: RwLock::new(moderators.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ModeratorRegistry for InMemoryModeratorRegistry {
    async fn is_moderator(&self, actor: &ActorId) -> CalendarResult<bool> {
        Ok(self.members.read().await.contains(actor))
    }

    async fn promote(&self, actor: &ActorId) -> CalendarResult<bool> {
        Ok(self.members.write().await.insert(actor.clone()))
    }

    async fn list(&self) -> CalendarResult<Vec<ActorId>> {
        Ok(self.members.read().await.iter().cloned().collect())
    }
}
