//! Desktop notification for stand-up reminders

use async_trait::async_trait;
use notify_rust::Notification;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::{error::ReminderError, messages::ReminderEvent};

pub const REMINDER_TITLE: &str = "Stand-up reminder";
pub const REMINDER_BODY: &str =
    "Time to stand up and move around! Sitting for long periods is bad for your health.";

/// Action key the notification server reports when the body is clicked
pub const CLICK_ACTION: &str = "default";

const APP_NAME: &str = "Stand Reminder";

/// Something that can put a reminder in front of the user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show_reminder(&self) -> Result<(), ReminderError>;
}

/// Notifier backed by the platform notification service
#[derive(Debug, Default, Clone)]
pub struct DesktopNotifier {
    clicks: Option<mpsc::UnboundedSender<ReminderEvent>>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report clicks on shown reminders as `show-main-window` requests.
    ///
    /// Only notification servers that report actions (freedesktop) deliver
    /// clicks; elsewhere the sender stays silent.
    pub fn with_click_events(mut self, clicks: mpsc::UnboundedSender<ReminderEvent>) -> Self {
        self.clicks = Some(clicks);
        self
    }
}

/// Forward a notification action; true when it was a click that got delivered
#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
pub(crate) fn report_action(action: &str, clicks: &mpsc::UnboundedSender<ReminderEvent>) -> bool {
    if action != CLICK_ACTION {
        return false;
    }
    debug!("Reminder notification clicked");
    clicks.send(ReminderEvent::ShowMainWindow).is_ok()
}

#[cfg(all(unix, not(target_os = "macos")))]
fn wait_for_click(
    handle: notify_rust::NotificationHandle,
    clicks: &mpsc::UnboundedSender<ReminderEvent>,
) {
    handle.wait_for_action(|action| {
        report_action(action, clicks);
    });
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn wait_for_click<H>(_handle: H, _clicks: &mpsc::UnboundedSender<ReminderEvent>) {}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn show_reminder(&self) -> Result<(), ReminderError> {
        debug!("Showing reminder notification");

        let clicks = self.clicks.clone();
        let (shown_tx, shown_rx) = oneshot::channel();

        // The platform call can block on the session bus, and waiting for a
        // click blocks until the notification is dismissed. Only the first
        // part is awaited.
        tokio::task::spawn_blocking(move || {
            let mut notification = Notification::new();
            notification
                .summary(REMINDER_TITLE)
                .body(REMINDER_BODY)
                .appname(APP_NAME);
            if clicks.is_some() {
                notification.action(CLICK_ACTION, "Show");
            }

            match notification.show() {
                Ok(handle) => {
                    let _ = shown_tx.send(Ok(()));
                    if let Some(clicks) = clicks {
                        wait_for_click(handle, &clicks);
                    }
                }
                Err(e) => {
                    let _ = shown_tx.send(Err(ReminderError::Notification(e.to_string())));
                }
            }
        });

        shown_rx.await.map_err(|_| {
            ReminderError::Notification("notification task ended unexpectedly".to_string())
        })?
    }
}
