//! Projection of events into display state

use serde::{Deserialize, Serialize};

use crate::messages::{Event, ReminderEvent, UpdateEvent};

pub const NO_RELEASE_NOTES: &str = "No release notes";

/// Text and affordances the main window shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    /// Offer the "download update" button
    pub download_available: bool,
    /// Offer the "restart to update" button
    pub restart_available: bool,
}

impl DisplayState {
    pub fn status(text: impl Into<String>) -> Self {
        Self {
            status: text.into(),
            release_notes: None,
            download_available: false,
            restart_available: false,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::status("Status: reminders running")
    }
}

/// "1 minute", "20 minutes"
pub(crate) fn minutes_label(minutes: u32) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

/// Map one event to what the window should show.
///
/// Returns `None` for events that carry nothing to display.
pub fn render(event: &Event) -> Option<DisplayState> {
    let display = match event {
        Event::Update(UpdateEvent::CheckingForUpdate) => {
            DisplayState::status("Status: checking for updates...")
        }
        Event::Update(UpdateEvent::UpdateAvailable(info)) => DisplayState {
            status: format!("Status: new version {} available", info.version),
            release_notes: Some(
                info.release_notes
                    .clone()
                    .unwrap_or_else(|| NO_RELEASE_NOTES.to_string()),
            ),
            download_available: true,
            restart_available: false,
        },
        Event::Update(UpdateEvent::UpdateNotAvailable(_)) => {
            DisplayState::status("Status: you are running the current version")
        }
        Event::Update(UpdateEvent::Error { .. }) => {
            DisplayState::status("Status: update check failed")
        }
        Event::Update(UpdateEvent::DownloadProgress { percent }) => {
            DisplayState::status(format!("Status: downloading update {}%", percent.round()))
        }
        Event::Update(UpdateEvent::UpdateDownloaded(_)) => DisplayState {
            status: "Status: update downloaded, restart to finish updating".to_string(),
            release_notes: None,
            download_available: false,
            restart_available: true,
        },
        Event::Reminder(ReminderEvent::StateChanged(snapshot)) => {
            if snapshot.paused {
                DisplayState::status("Status: reminders paused")
            } else {
                DisplayState::status(format!(
                    "Status: reminders running, every {}",
                    minutes_label(snapshot.interval_minutes)
                ))
            }
        }
        Event::Reminder(ReminderEvent::ShowMainWindow) => return None,
    };
    Some(display)
}
