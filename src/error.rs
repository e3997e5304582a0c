//! Error types shared across the reminder daemon

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the reminder daemon
#[derive(Debug, Error)]
pub enum ReminderError {
    /// User input rejected at the UI boundary
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A required asset (e.g. the tray icon) could not be found
    #[error("resource unavailable: {}", .0.display())]
    ResourceUnavailable(PathBuf),

    /// The desktop notification could not be shown
    #[error("failed to show notification: {0}")]
    Notification(String),

    /// The update service failed
    #[error("update failed: {0}")]
    Update(String),

    /// The dispatch loop is gone
    #[error("command channel closed")]
    ChannelClosed,
}

/// Rejected user input, carrying the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a whole number between {min} and {max}")]
    IntervalOutOfRange { min: u32, max: u32 },

    #[error("Please enter a whole number between {min} and {max}")]
    IntervalNotNumeric { min: u32, max: u32 },
}
