//! Telegram transport: turns updates into dialogue actions and renders responses.

/// Bot command definitions
pub mod commands;
/// Update handlers
pub mod handlers;
/// Inline keyboard rendering and user mapping
pub mod keyboard;
