/// Events and comments
pub mod event;
/// Moderator registry
pub mod moderator;

pub use event::*;
