//! Update check coordination
//!
//! Forwards user requests to the [`UpdateService`] and relays its events,
//! keeping an [`UpdateState`] that only moves along the check cycle's order.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{messages::UpdateEvent, services::UpdateService, state::UpdateState};

pub struct UpdateCoordinator {
    state: UpdateState,
    service: Arc<dyn UpdateService>,
    /// A download was handed to the service and has not finished or failed yet
    download_pending: bool,
}

impl UpdateCoordinator {
    pub fn new(service: Arc<dyn UpdateService>) -> Self {
        Self {
            state: UpdateState::Idle,
            service,
            download_pending: false,
        }
    }

    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    /// Whether a check or download is in flight, including a download the
    /// service has not reported progress for yet
    pub fn is_busy(&self) -> bool {
        self.download_pending || self.state.is_busy()
    }

    /// Start a check cycle. Returns the local `checking-for-update` event to
    /// relay right away, or `None` when a check or download is already running.
    pub fn request_check(&mut self) -> Option<UpdateEvent> {
        if self.is_busy() {
            info!("Update check ignored, one is already in progress");
            return None;
        }

        info!("Checking for updates");
        self.state = UpdateState::Checking;
        self.service.check_for_updates();
        Some(UpdateEvent::CheckingForUpdate)
    }

    pub fn request_download(&mut self) {
        if matches!(self.state, UpdateState::Available(_)) {
            self.download_pending = true;
        } else {
            warn!("Download requested without an available update");
        }
        self.service.download_update();
    }

    /// Hand over to the service; the process is expected to exit shortly after
    pub fn request_install(&mut self) {
        if !matches!(self.state, UpdateState::Downloaded(_)) {
            warn!("Install requested before an update was downloaded");
        }
        info!("Quitting to install update");
        self.service.quit_and_install();
    }

    /// Apply an event from the service, returning it for relay if it fits the
    /// current check cycle
    pub fn handle_service_event(&mut self, event: UpdateEvent) -> Option<UpdateEvent> {
        match self.state.transition(&event) {
            Some(next) => {
                debug!("Update state {:?} -> {:?}", self.state, next);
                if let UpdateEvent::Error { message } = &event {
                    warn!("Update check failed: {}", message);
                }
                if !matches!(next, UpdateState::Available(_) | UpdateState::Downloading(_)) {
                    self.download_pending = false;
                }
                self.state = next;
                Some(event)
            }
            None => {
                warn!(
                    "Dropping out-of-order update event {} in state {:?}",
                    event.name(),
                    self.state
                );
                None
            }
        }
    }
}
