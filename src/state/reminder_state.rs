//! Reminder configuration and published reminder state

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Smallest accepted reminder interval, in minutes
pub const MIN_INTERVAL_MINUTES: u32 = 1;
/// Largest accepted reminder interval, in minutes
pub const MAX_INTERVAL_MINUTES: u32 = 180;
/// Interval used when nothing else is configured
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

const MS_PER_MINUTE: u64 = 60_000;

/// Reminder period configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    interval_ms: u64,
}

impl ReminderConfig {
    /// Build a configuration from a minute count already validated by the caller
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            interval_ms: u64::from(minutes) * MS_PER_MINUTE,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn interval_minutes(&self) -> u32 {
        (self.interval_ms / MS_PER_MINUTE) as u32
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_INTERVAL_MINUTES)
    }
}

/// Point-in-time view of the reminder controller, published after every command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSnapshot {
    pub paused: bool,
    pub interval_minutes: u32,
    pub timer_active: bool,
}

impl ReminderSnapshot {
    /// The state a freshly started controller reports
    pub fn running(interval_minutes: u32) -> Self {
        Self {
            paused: false,
            interval_minutes,
            timer_active: true,
        }
    }
}

impl Default for ReminderSnapshot {
    fn default() -> Self {
        Self::running(DEFAULT_INTERVAL_MINUTES)
    }
}
