use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::calendar::{ActorId, EventId, Visibility};

/// Where an actor is in the dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueState {
    /// No prompt pending.
    #[default]
    Idle,
    /// Waiting for `<date> <title>` of a new event.
    AwaitingEventInput,
    /// Waiting for `да`/`yes` to remove the selected event.
    AwaitingRemovalConfirmation,
    /// Waiting for a comment on the selected event.
    AwaitingComment,
    /// Waiting for the new date and title of the selected event.
    AwaitingEditInput,
    /// Waiting for the id of the actor to promote.
    AwaitingPromotionTarget,
}

/// Transient dialogue state of one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Current step.
    pub state: DialogueState,
    /// Event opened in the detail view, if any.
    pub selected_event_id: Option<EventId>,
    /// Visibility chosen for the event being added.
    pub pending_visibility: Option<Visibility>,
}

impl Session {
    /// Nothing pending, nothing selected.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Idle with an event selected, as after opening its detail view.
    pub fn selected(id: EventId) -> Self {
        Self {
            selected_event_id: Some(id),
            ..Self::default()
        }
    }

    /// Same selection, waiting in `state`.
    pub fn awaiting(self, state: DialogueState) -> Self {
        Self { state, ..self }
    }
}

/// Guard over one actor's session for the length of a turn.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Sessions keyed by actor. Records are created on first use and never removed.
///
/// Holding a [`SessionGuard`] excludes other turns of the same actor only.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ActorId, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the actor's session until the guard is dropped.
    pub async fn begin_turn(&self, actor: &ActorId) -> SessionGuard {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            sessions.entry(actor.clone()).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Copy of the actor's session, waiting for any turn in progress.
    pub async fn snapshot(&self, actor: &ActorId) -> Session {
        self.begin_turn(actor).await.clone()
    }

    /// Number of actors with a session.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no actor has a session yet.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
