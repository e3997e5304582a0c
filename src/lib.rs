//! Stand Reminder - a desktop reminder to stand up
//!
//! A single dispatch loop owns the reminder timer, the pause flag and the
//! update lifecycle. A local HTTP API acts as the UI channel: user actions are
//! validated and turned into commands, and events flow back as display state.

pub mod api;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod messages;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::ReminderError;
pub use messages::{Command, Event};
pub use state::AppState;
pub use utils::shutdown_signal;
