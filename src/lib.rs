//! # Shared Calendar Bot
//!
//! A Telegram bot for a calendar shared by a group of people.
//!
//! ## Features
//! - Add public or private events through a short chat dialogue
//! - Browse events for the next week, this month or this year
//! - Comment on events; edit and remove your own
//! - Moderators can change any event and promote other moderators
//! - Persistent storage with SQLite
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Telegram command, message and callback handlers
pub mod bot;
/// Event records, access rules and period filtering
pub mod calendar;
/// Configuration management and environment variables
pub mod config;
/// Event repository and moderator registry implementations
pub mod database;
/// Per-user dialogue state machine
pub mod dialogue;
/// Background services like the health endpoint
pub mod services;
/// Utility functions for dates, validation, and logging
pub mod utils;
