//! Per-actor dialogue state machine over the calendar stores.

/// Inbound turns
pub mod action;
/// The state machine
pub mod engine;
/// Menu tokens
pub mod menu;
/// Outbound responses
pub mod response;
/// Per-actor sessions
pub mod session;

pub use action::{Action, ActionKind, Actor};
pub use engine::DialogueEngine;
pub use menu::MenuChoice;
pub use response::{Choice, FeedbackType, Response};
pub use session::{DialogueState, Session, SessionStore};
