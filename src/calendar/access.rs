//! Who may see and who may change an event.
//!
//! The pure checks take moderator status as a flag so that callers decide
//! when to consult the registry. Commit paths use [`authorize_modify`], which
//! always asks the registry again instead of trusting an earlier answer.

use super::error::{CalendarError, CalendarResult};
use super::event::{ActorId, Event, Visibility};
use crate::database::ModeratorRegistry;

/// Owners and moderators may edit or remove an event.
pub fn can_modify(event: &Event, actor: &ActorId, is_moderator: bool) -> bool {
    event.owner == *actor || is_moderator
}

/// Public events are visible to everyone; private ones to owner and moderators.
pub fn can_view(event: &Event, actor: &ActorId, is_moderator: bool) -> bool {
    event.visibility == Visibility::Public || event.owner == *actor || is_moderator
}

/// Commit-time authorization for edit and remove.
pub async fn authorize_modify(
    event: &Event,
    actor: &ActorId,
    moderators: &dyn ModeratorRegistry,
) -> CalendarResult<()> {
    if event.owner == *actor {
        return Ok(());
    }
    if moderators.is_moderator(actor).await? {
        return Ok(());
    }
    Err(CalendarError::Permission(
        "only the owner or a moderator can change this event".to_string(),
    ))
}
