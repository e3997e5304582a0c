//! State management module
//!
//! Reminder and update state owned by the dispatch loop, and the UI-side
//! application state shared with the HTTP handlers.

pub mod app_state;
pub mod reminder_state;
pub mod update_state;

pub use app_state::AppState;
pub use reminder_state::{
    ReminderConfig, ReminderSnapshot, DEFAULT_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES,
    MIN_INTERVAL_MINUTES,
};
pub use update_state::UpdateState;
