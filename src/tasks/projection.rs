//! UI-side background tasks: event projection, tray menu sync and
//! notification clicks

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::{
    bridge::{Tray, UiBridge},
    messages::{Event, ReminderEvent},
    state::{app_state::lock, ReminderSnapshot},
};

/// Apply every event from the dispatch loop to the UI bridge
pub async fn ui_projection_task(bridge: Arc<Mutex<UiBridge>>, mut events: broadcast::Receiver<Event>) {
    info!("Starting UI projection task");

    loop {
        match events.recv().await {
            Ok(event) => {
                debug!("Projecting event {}", event.name());
                lock(&bridge).apply_event(&event);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("UI projection lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("Event channel closed, stopping UI projection");
                break;
            }
        }
    }
}

/// Rebuild the tray menu on every published reminder snapshot
pub async fn tray_sync_task(tray: Arc<Mutex<Tray>>, mut snapshots: watch::Receiver<ReminderSnapshot>) {
    info!("Starting tray sync task");

    while snapshots.changed().await.is_ok() {
        let paused = snapshots.borrow_and_update().paused;
        lock(&tray).rebuild(paused);
    }

    info!("Reminder state channel closed, stopping tray sync");
}

/// Publish requests coming from clicked notifications to the UI
pub async fn notification_click_task(
    events: broadcast::Sender<Event>,
    mut clicks: mpsc::UnboundedReceiver<ReminderEvent>,
) {
    while let Some(request) = clicks.recv().await {
        if events.send(request.into()).is_err() {
            warn!("No UI attached to handle notification click");
        }
    }
    debug!("Notification click channel closed");
}
