//! Application quit handling and the last-window-closed policy

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// What to do when the last window closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowClosePolicy {
    /// Quit the application
    Quit,
    /// Stay resident until an explicit quit (dock-style platforms)
    StayResident,
}

impl WindowClosePolicy {
    /// Policy for the platform this binary was built for
    pub fn for_platform() -> Self {
        if cfg!(target_os = "macos") {
            WindowClosePolicy::StayResident
        } else {
            WindowClosePolicy::Quit
        }
    }
}

/// Cloneable handle used to request and await application quit
#[derive(Debug, Clone)]
pub struct Lifecycle {
    quit_tx: Arc<watch::Sender<bool>>,
    policy: WindowClosePolicy,
}

impl Lifecycle {
    pub fn new(policy: WindowClosePolicy) -> Self {
        let (quit_tx, _) = watch::channel(false);
        Self {
            quit_tx: Arc::new(quit_tx),
            policy,
        }
    }

    /// Ask every component to shut down
    pub fn request_quit(&self) {
        info!("Quit requested");
        self.quit_tx.send_replace(true);
    }

    pub fn is_quitting(&self) -> bool {
        *self.quit_tx.borrow()
    }

    /// Resolves once quit has been requested
    pub async fn quit_requested(&self) {
        let mut rx = self.quit_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|quitting| *quitting).await;
    }

    /// Apply the close policy; returns whether the application is quitting
    pub fn on_all_windows_closed(&self) -> bool {
        match self.policy {
            WindowClosePolicy::Quit => {
                self.request_quit();
                true
            }
            WindowClosePolicy::StayResident => {
                info!("All windows closed, staying resident until explicit quit");
                false
            }
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(WindowClosePolicy::for_platform())
    }
}
