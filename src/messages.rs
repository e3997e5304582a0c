//! Typed command and event messages exchanged between the UI side and the
//! dispatch loop

use serde::{Deserialize, Serialize};

use crate::state::ReminderSnapshot;

/// Commands sent from the UI side to the dispatch loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Command {
    /// Restart the reminder timer at a new period, in minutes (1-180)
    SetInterval(u32),
    /// Show one reminder now unless paused
    TriggerNow,
    /// Pause (`true`) or resume (`false`) reminders
    SetPaused(bool),
    RequestCheck,
    RequestDownload,
    RequestInstall,
}

impl Command {
    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetInterval(_) => "set-interval",
            Command::TriggerNow => "trigger-now",
            Command::SetPaused(_) => "set-paused",
            Command::RequestCheck => "request-check",
            Command::RequestDownload => "request-download",
            Command::RequestInstall => "request-install",
        }
    }
}

/// Version information attached to update events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

impl UpdateInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            release_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.release_notes = Some(notes.into());
        self
    }
}

/// Events emitted by the update service and relayed verbatim to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum UpdateEvent {
    CheckingForUpdate,
    UpdateAvailable(UpdateInfo),
    UpdateNotAvailable(UpdateInfo),
    #[serde(rename = "update-error")]
    Error { message: String },
    DownloadProgress { percent: f64 },
    UpdateDownloaded(UpdateInfo),
}

impl UpdateEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UpdateEvent::CheckingForUpdate => "checking-for-update",
            UpdateEvent::UpdateAvailable(_) => "update-available",
            UpdateEvent::UpdateNotAvailable(_) => "update-not-available",
            UpdateEvent::Error { .. } => "update-error",
            UpdateEvent::DownloadProgress { .. } => "download-progress",
            UpdateEvent::UpdateDownloaded(_) => "update-downloaded",
        }
    }
}

/// Reminder-side events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ReminderEvent {
    /// Pause flag or interval changed (or was re-asserted)
    StateChanged(ReminderSnapshot),
    /// Ask the UI to bring the main window forward
    ShowMainWindow,
}

/// Everything that flows from the dispatch loop to the UI side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Event {
    Update(UpdateEvent),
    Reminder(ReminderEvent),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Update(event) => event.name(),
            Event::Reminder(ReminderEvent::StateChanged(_)) => "state-changed",
            Event::Reminder(ReminderEvent::ShowMainWindow) => "show-main-window",
        }
    }
}

impl From<UpdateEvent> for Event {
    fn from(event: UpdateEvent) -> Self {
        Event::Update(event)
    }
}

impl From<ReminderEvent> for Event {
    fn from(event: ReminderEvent) -> Self {
        Event::Reminder(event)
    }
}
