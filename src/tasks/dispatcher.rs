//! Dispatch loop: the single owner of reminder and update state
//!
//! Commands, update-service events and timer ticks are handled one at a time,
//! each running to completion before the next is looked at.

use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info};

use crate::{
    controller::{ReminderController, UpdateCoordinator},
    messages::{Command, Event, ReminderEvent, UpdateEvent},
    state::{ReminderSnapshot, UpdateState},
    utils::Lifecycle,
};

const EVENT_CAPACITY: usize = 100;

/// Receiving ends handed to the UI side
#[derive(Debug)]
pub struct DispatcherLinks {
    pub events: broadcast::Sender<Event>,
    pub reminder_rx: watch::Receiver<ReminderSnapshot>,
    pub update_rx: watch::Receiver<UpdateState>,
}

pub struct Dispatcher {
    reminder: ReminderController,
    updates: UpdateCoordinator,
    commands: mpsc::UnboundedReceiver<Command>,
    service_events: mpsc::UnboundedReceiver<UpdateEvent>,
    event_tx: broadcast::Sender<Event>,
    reminder_tx: watch::Sender<ReminderSnapshot>,
    update_tx: watch::Sender<UpdateState>,
    lifecycle: Lifecycle,
    auto_check: bool,
}

impl Dispatcher {
    pub fn new(
        reminder: ReminderController,
        updates: UpdateCoordinator,
        commands: mpsc::UnboundedReceiver<Command>,
        service_events: mpsc::UnboundedReceiver<UpdateEvent>,
        lifecycle: Lifecycle,
    ) -> (Self, DispatcherLinks) {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let (reminder_tx, reminder_rx) = watch::channel(reminder.snapshot());
        let (update_tx, update_rx) = watch::channel(updates.state().clone());

        let links = DispatcherLinks {
            events: event_tx.clone(),
            reminder_rx,
            update_rx,
        };
        let dispatcher = Self {
            reminder,
            updates,
            commands,
            service_events,
            event_tx,
            reminder_tx,
            update_tx,
            lifecycle,
            auto_check: false,
        };
        (dispatcher, links)
    }

    /// Issue one update check as soon as the loop starts
    pub fn with_auto_check(mut self, enabled: bool) -> Self {
        self.auto_check = enabled;
        self
    }

    pub async fn run(mut self) {
        info!("Starting dispatch loop");

        if self.auto_check {
            info!("Running startup update check");
            self.handle_command(Command::RequestCheck).await;
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        info!("Command channel closed");
                        break;
                    }
                },
                Some(event) = self.service_events.recv() => {
                    self.relay_update(event);
                }
                _ = self.reminder.next_tick() => {
                    self.reminder.on_tick().await;
                }
                _ = self.lifecycle.quit_requested() => {
                    info!("Dispatch loop stopping for quit");
                    break;
                }
            }
        }

        self.reminder.shutdown();
        info!("Dispatch loop stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        debug!("Handling command {}", command.name());

        match command {
            Command::SetInterval(minutes) => {
                let snapshot = self.reminder.set_interval(minutes);
                self.publish_reminder(snapshot);
            }
            Command::TriggerNow => {
                self.reminder.trigger_now().await;
            }
            Command::SetPaused(paused) => {
                let snapshot = self.reminder.set_paused(paused);
                self.publish_reminder(snapshot);
            }
            Command::RequestCheck => {
                if let Some(event) = self.updates.request_check() {
                    self.publish_update(event);
                }
            }
            Command::RequestDownload => self.updates.request_download(),
            Command::RequestInstall => self.updates.request_install(),
        }
    }

    fn relay_update(&mut self, event: UpdateEvent) {
        if let Some(event) = self.updates.handle_service_event(event) {
            self.publish_update(event);
        }
    }

    fn publish_reminder(&self, snapshot: ReminderSnapshot) {
        // Always notify, even when unchanged: the tray rebuilds on every publish.
        self.reminder_tx.send_replace(snapshot);
        self.broadcast(ReminderEvent::StateChanged(snapshot).into());
    }

    fn publish_update(&self, event: UpdateEvent) {
        self.update_tx.send_replace(self.updates.state().clone());
        self.broadcast(event.into());
    }

    fn broadcast(&self, event: Event) {
        if self.event_tx.send(event).is_err() {
            debug!("No UI listeners for event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        messages::UpdateInfo,
        state::ReminderConfig,
        test_support::{RecordingNotifier, RecordingUpdateService},
        utils::WindowClosePolicy,
    };
    use std::{sync::Arc, time::Duration};
    use tokio::task::JoinHandle;

    struct Harness {
        commands: mpsc::UnboundedSender<Command>,
        service_tx: mpsc::UnboundedSender<UpdateEvent>,
        links: DispatcherLinks,
        events: broadcast::Receiver<Event>,
        notifier: Arc<RecordingNotifier>,
        service: Arc<RecordingUpdateService>,
        lifecycle: Lifecycle,
        handle: JoinHandle<()>,
    }

    fn start(auto_check: bool) -> Harness {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = Arc::new(RecordingUpdateService::default());
        let lifecycle = Lifecycle::new(WindowClosePolicy::Quit);
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (service_tx, service_rx) = mpsc::unbounded_channel();

        let (dispatcher, links) = Dispatcher::new(
            ReminderController::new(ReminderConfig::default(), notifier.clone()),
            UpdateCoordinator::new(service.clone()),
            command_rx,
            service_rx,
            lifecycle.clone(),
        );
        let events = links.events.subscribe();
        let handle = tokio::spawn(dispatcher.with_auto_check(auto_check).run());

        Harness {
            commands,
            service_tx,
            links,
            events,
            notifier,
            service,
            lifecycle,
            handle,
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn one_minute_interval_shows_one_reminder_per_minute() {
        let h = start(false);
        h.commands.send(Command::SetInterval(1)).unwrap();

        tokio::time::sleep(Duration::from_millis(60_001)).await;
        assert_eq!(h.notifier.count(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(h.notifier.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_trigger_shows_nothing() {
        let h = start(false);
        h.commands.send(Command::SetPaused(true)).unwrap();
        h.commands.send(Command::TriggerNow).unwrap();
        settle().await;
        assert_eq!(h.notifier.count(), 0);

        h.commands.send(Command::SetPaused(false)).unwrap();
        h.commands.send(Command::TriggerNow).unwrap();
        settle().await;
        assert_eq!(h.notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_interval_stays_silent() {
        let h = start(false);
        h.commands.send(Command::SetInterval(1)).unwrap();
        h.commands.send(Command::SetPaused(true)).unwrap();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(h.notifier.count(), 0);
        assert!(!h.links.reminder_rx.borrow().timer_active);
    }

    #[tokio::test(start_paused = true)]
    async fn every_pause_command_publishes_a_snapshot() {
        let mut h = start(false);
        let mut reminder_rx = h.links.reminder_rx.clone();
        reminder_rx.borrow_and_update();

        h.commands.send(Command::SetPaused(false)).unwrap();
        reminder_rx.changed().await.unwrap();
        assert!(!reminder_rx.borrow_and_update().paused);

        match h.events.recv().await.unwrap() {
            Event::Reminder(ReminderEvent::StateChanged(snapshot)) => {
                assert!(!snapshot.paused);
                assert_eq!(snapshot.interval_minutes, 60);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn check_then_not_available_settles_state() {
        let mut h = start(false);
        h.commands.send(Command::RequestCheck).unwrap();

        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::from(UpdateEvent::CheckingForUpdate)
        );
        assert_eq!(h.service.calls(), vec!["check"]);

        let not_available = UpdateEvent::UpdateNotAvailable(UpdateInfo::new("1.0.0"));
        h.service_tx.send(not_available.clone()).unwrap();
        assert_eq!(h.events.recv().await.unwrap(), Event::from(not_available));
        assert_eq!(*h.links.update_rx.borrow(), UpdateState::NotAvailable);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_service_events_are_not_relayed() {
        let mut h = start(false);
        h.service_tx
            .send(UpdateEvent::UpdateDownloaded(UpdateInfo::new("9.9.9")))
            .unwrap();
        settle().await;

        assert!(matches!(
            h.events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert_eq!(*h.links.update_rx.borrow(), UpdateState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn startup_check_runs_once_without_user_action() {
        let mut h = start(true);
        assert_eq!(
            h.events.recv().await.unwrap(),
            Event::from(UpdateEvent::CheckingForUpdate)
        );
        assert_eq!(h.service.calls(), vec!["check"]);

        h.commands.send(Command::RequestCheck).unwrap();
        settle().await;
        assert_eq!(h.service.calls(), vec!["check"]);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_stops_the_loop() {
        let h = start(false);
        h.lifecycle.request_quit();
        tokio::time::timeout(Duration::from_secs(1), h.handle)
            .await
            .expect("dispatcher should stop")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_command_channel_stops_the_loop() {
        let h = start(false);
        drop(h.commands);
        tokio::time::timeout(Duration::from_secs(1), h.handle)
            .await
            .expect("dispatcher should stop")
            .unwrap();
    }
}
