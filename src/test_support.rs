//! Test doubles shared by the unit tests

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::{error::ReminderError, services::Notifier, services::UpdateService};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    shown: AtomicUsize,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn show_reminder(&self) -> Result<(), ReminderError> {
        self.shown.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn show_reminder(&self) -> Result<(), ReminderError> {
        Err(ReminderError::Notification("no notification daemon".to_string()))
    }
}

/// Records which update-service calls were made, emitting nothing on its own
#[derive(Debug, Default)]
pub struct RecordingUpdateService {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingUpdateService {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl UpdateService for RecordingUpdateService {
    fn check_for_updates(&self) {
        self.record("check");
    }

    fn download_update(&self) {
        self.record("download");
    }

    fn quit_and_install(&self) {
        self.record("install");
    }
}
