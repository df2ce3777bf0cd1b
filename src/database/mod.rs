//! Event repository and moderator registry: contracts and implementations.

/// SQLite pool and migrations
pub mod connection;
/// In-memory stores
pub mod memory;
/// SQLite implementations of the store traits
pub mod models;
/// Store traits used by the dialogue engine
pub mod repository;

pub use connection::DatabaseManager;
pub use memory::{InMemoryEventRepository, InMemoryModeratorRegistry};
pub use repository::{EventRepository, ModeratorRegistry};
