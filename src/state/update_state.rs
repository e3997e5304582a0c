//! Update lifecycle state

use serde::{Deserialize, Serialize};

use crate::messages::{UpdateEvent, UpdateInfo};

/// Where the current update check cycle stands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", content = "detail", rename_all = "kebab-case")]
pub enum UpdateState {
    #[default]
    Idle,
    Checking,
    Available(UpdateInfo),
    NotAvailable,
    /// Download percentage in [0, 100]
    Downloading(f64),
    Downloaded(UpdateInfo),
}

impl UpdateState {
    /// Whether a check or download is currently in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, UpdateState::Checking | UpdateState::Downloading(_))
    }

    /// Apply a service event, returning the next state or `None` when the event
    /// does not follow the check cycle's partial order from this state.
    ///
    /// Errors are accepted from every state and end the cycle back at `Idle`.
    pub fn transition(&self, event: &UpdateEvent) -> Option<UpdateState> {
        use UpdateState::*;

        match (self, event) {
            (_, UpdateEvent::Error { .. }) => Some(Idle),
            (Downloading(_), UpdateEvent::CheckingForUpdate) => None,
            (_, UpdateEvent::CheckingForUpdate) => Some(Checking),
            (Checking, UpdateEvent::UpdateAvailable(info)) => Some(Available(info.clone())),
            (Checking, UpdateEvent::UpdateNotAvailable(_)) => Some(NotAvailable),
            (Available(_) | Downloading(_), UpdateEvent::DownloadProgress { percent }) => {
                Some(Downloading(percent.clamp(0.0, 100.0)))
            }
            (Available(_) | Downloading(_), UpdateEvent::UpdateDownloaded(info)) => {
                Some(Downloaded(info.clone()))
            }
            _ => None,
        }
    }
}
