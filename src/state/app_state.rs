//! UI-side application state shared by the HTTP handlers

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{info, warn};

use super::{ReminderSnapshot, UpdateState};
use crate::{
    bridge::{Tray, TrayAction, TrayItem, TrayMenu, UiBridge, UserAction, View},
    error::ReminderError,
    messages::{Command, Event, ReminderEvent},
    tasks::DispatcherLinks,
    utils::Lifecycle,
};

/// Lock a mutex, recovering the data if a previous holder panicked
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Everything the UI side needs: the command sender, the published state from
/// the dispatch loop, and its own display projection
#[derive(Debug)]
pub struct AppState {
    /// Commands to the dispatch loop
    pub commands: mpsc::UnboundedSender<Command>,
    /// Events from the dispatch loop
    pub events: broadcast::Sender<Event>,
    pub reminder_rx: watch::Receiver<ReminderSnapshot>,
    pub update_rx: watch::Receiver<UpdateState>,
    /// Display projection
    pub bridge: Arc<Mutex<UiBridge>>,
    /// Absent when the tray icon could not be loaded
    pub tray: Option<Arc<Mutex<Tray>>>,
    pub lifecycle: Lifecycle,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        port: u16,
        host: String,
        commands: mpsc::UnboundedSender<Command>,
        links: DispatcherLinks,
        tray: Option<Tray>,
        lifecycle: Lifecycle,
    ) -> Self {
        let mut bridge = UiBridge::new();
        let snapshot = *links.reminder_rx.borrow();
        bridge.apply_event(&ReminderEvent::StateChanged(snapshot).into());

        Self {
            commands,
            events: links.events,
            reminder_rx: links.reminder_rx,
            update_rx: links.update_rx,
            bridge: Arc::new(Mutex::new(bridge)),
            tray: tray.map(|tray| Arc::new(Mutex::new(tray))),
            lifecycle,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Send a command to the dispatch loop and record it as the last action
    pub fn send(&self, command: Command) -> Result<(), ReminderError> {
        let name = command.name();
        self.commands
            .send(command)
            .map_err(|_| ReminderError::ChannelClosed)?;

        *lock(&self.last_action) = Some(name.to_string());
        *lock(&self.last_action_time) = Some(Utc::now());
        Ok(())
    }

    /// Run a user action through the bridge and send the resulting command.
    /// The view only changes once the command is on its way.
    pub fn user_action(&self, action: UserAction) -> Result<View, ReminderError> {
        let command = lock(&self.bridge).handle_action(action)?;
        self.send(command.clone())?;

        let mut bridge = lock(&self.bridge);
        bridge.command_sent(&command);
        Ok(bridge.view())
    }

    /// Activate a tray menu item. Returns `None` when there is no tray.
    ///
    /// The toggle follows the published reminder state, which may be ahead
    /// of the last menu rebuild.
    pub fn activate_tray(&self, item: TrayItem) -> Option<Result<TrayAction, ReminderError>> {
        self.tray.as_ref()?;
        let action = item.action(self.reminder_snapshot().paused);
        info!("Tray item {:?} activated", item);

        let result = match &action {
            TrayAction::Send(command) => self.send(command.clone()),
            TrayAction::ShowMainWindow => {
                self.show_main_window();
                Ok(())
            }
            TrayAction::Quit => {
                self.lifecycle.request_quit();
                Ok(())
            }
        };
        Some(result.map(|()| action))
    }

    /// Ask the UI to surface the main window
    pub fn show_main_window(&self) {
        if self
            .events
            .send(ReminderEvent::ShowMainWindow.into())
            .is_err()
        {
            warn!("No UI attached to show the main window");
        }
    }

    pub fn view(&self) -> View {
        lock(&self.bridge).view()
    }

    pub fn reminder_snapshot(&self) -> ReminderSnapshot {
        *self.reminder_rx.borrow()
    }

    pub fn update_state(&self) -> UpdateState {
        self.update_rx.borrow().clone()
    }

    pub fn tray_menu(&self) -> Option<TrayMenu> {
        self.tray.as_ref().map(|tray| lock(tray).menu().clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = lock(&self.last_action).clone();
        let last_action_time = *lock(&self.last_action_time);
        (last_action, last_action_time)
    }
}
