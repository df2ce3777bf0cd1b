//! Calendar domain: event records, access rules and period views.

/// Who may see or change an event
pub mod access;
/// Error taxonomy
pub mod error;
/// Event records and ids
pub mod event;
/// Week, month and year views
pub mod period;

pub use access::{authorize_modify, can_modify, can_view};
pub use error::{CalendarError, CalendarResult, ErrorKind};
pub use event::{ActorId, Comment, Event, EventId, EventPatch, NewEvent, Visibility};
pub use period::{filter_events, Period};
