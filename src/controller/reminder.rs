//! Reminder timer and pause/resume controller
//!
//! The controller owns the one repeating timer. The timer exists exactly when
//! reminders are not paused; every interval change or pause drops the old
//! [`Interval`] before a new one is created.

use std::sync::Arc;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    services::Notifier,
    state::{ReminderConfig, ReminderSnapshot, MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES},
};

#[derive(Debug)]
struct ReminderTimer {
    interval: Interval,
    generation: u64,
}

/// Owns the reminder interval, the pause flag and the repeating timer
pub struct ReminderController {
    config: ReminderConfig,
    paused: bool,
    timer: Option<ReminderTimer>,
    notifier: Arc<dyn Notifier>,
    timers_started: u64,
    reminders_shown: u64,
}

impl ReminderController {
    /// Create a running controller; the first reminder fires one full interval from now
    pub fn new(config: ReminderConfig, notifier: Arc<dyn Notifier>) -> Self {
        let mut controller = Self {
            config,
            paused: false,
            timer: None,
            notifier,
            timers_started: 0,
            reminders_shown: 0,
        };
        controller.start_timer();
        controller
    }

    /// Store a new interval and restart the timer at that period if running.
    ///
    /// Range checking belongs to the UI boundary; out-of-range values are clamped.
    pub fn set_interval(&mut self, minutes: u32) -> ReminderSnapshot {
        let clamped = minutes.clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
        if clamped != minutes {
            warn!("Interval {} minutes out of range, using {}", minutes, clamped);
        }

        self.config = ReminderConfig::from_minutes(clamped);
        info!("Reminder interval set to {} minutes", clamped);

        self.cancel_timer();
        if !self.paused {
            self.start_timer();
        }
        self.snapshot()
    }

    /// Show one reminder right away unless paused. The schedule is untouched.
    pub async fn trigger_now(&mut self) -> bool {
        if self.paused {
            debug!("Manual reminder suppressed while paused");
            return false;
        }
        self.show().await
    }

    /// Pause or resume reminders. Re-asserting the current value changes nothing
    /// but still yields a snapshot so the tray menu gets rebuilt.
    pub fn set_paused(&mut self, paused: bool) -> ReminderSnapshot {
        match (self.paused, paused) {
            (false, true) => {
                self.cancel_timer();
                self.paused = true;
                info!("Reminders paused");
            }
            (true, false) => {
                self.paused = false;
                self.start_timer();
                info!(
                    "Reminders resumed, every {} minutes",
                    self.config.interval_minutes()
                );
            }
            _ => debug!("Pause state already {}", paused),
        }
        self.snapshot()
    }

    /// Resolves at the next timer tick; never resolves while paused
    pub async fn next_tick(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => {
                timer.interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Handle a timer tick, showing exactly one reminder unless paused
    pub async fn on_tick(&mut self) -> bool {
        if self.paused {
            debug!("Timer tick suppressed, reminders are paused");
            return false;
        }
        if let Some(timer) = &self.timer {
            debug!("Reminder timer #{} fired", timer.generation);
        }
        self.show().await
    }

    /// Drop the timer; called once when the dispatch loop exits
    pub fn shutdown(&mut self) {
        self.cancel_timer();
        info!(
            "Reminder controller stopped after {} reminders",
            self.reminders_shown
        );
    }

    pub fn snapshot(&self) -> ReminderSnapshot {
        ReminderSnapshot {
            paused: self.paused,
            interval_minutes: self.config.interval_minutes(),
            timer_active: self.timer.is_some(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn config(&self) -> ReminderConfig {
        self.config
    }

    /// Number of timers created over the controller's lifetime
    pub fn timers_started(&self) -> u64 {
        self.timers_started
    }

    pub fn reminders_shown(&self) -> u64 {
        self.reminders_shown
    }

    fn start_timer(&mut self) {
        // Release the previous timer before arming a new one.
        self.cancel_timer();

        let period = self.config.interval();
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.timers_started += 1;
        debug!(
            "Started reminder timer #{} ({}ms)",
            self.timers_started,
            self.config.interval_ms()
        );
        self.timer = Some(ReminderTimer {
            interval,
            generation: self.timers_started,
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!("Cancelled reminder timer #{}", timer.generation);
        }
    }

    async fn show(&mut self) -> bool {
        match self.notifier.show_reminder().await {
            Ok(()) => {
                self.reminders_shown += 1;
                true
            }
            Err(e) => {
                warn!("Failed to show reminder: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingNotifier, RecordingNotifier};
    use std::time::Duration;
    use tokio::time::sleep_until;

    const MINUTE: Duration = Duration::from_secs(60);

    fn controller(minutes: u32) -> (ReminderController, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = ReminderController::new(
            ReminderConfig::from_minutes(minutes),
            notifier.clone(),
        );
        (controller, notifier)
    }

    /// Drive the controller like the dispatch loop does, for `duration`
    async fn run_for(controller: &mut ReminderController, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                biased;
                _ = controller.next_tick() => {
                    controller.on_tick().await;
                }
                _ = sleep_until(deadline) => break,
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_minute_interval_fires_once_per_minute() {
        let (mut controller, notifier) = controller(60);
        controller.set_interval(1);

        run_for(&mut controller, MINUTE + Duration::from_millis(1)).await;
        assert_eq!(notifier.count(), 1);

        run_for(&mut controller, MINUTE * 2).await;
        assert_eq!(notifier.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_first_period_elapses() {
        let (mut controller, notifier) = controller(5);
        run_for(&mut controller, MINUTE * 5 - Duration::from_millis(1)).await;
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_controller_never_fires() {
        let (mut controller, notifier) = controller(1);
        let snapshot = controller.set_paused(true);

        assert!(snapshot.paused);
        assert!(!snapshot.timer_active);
        run_for(&mut controller, MINUTE * 30).await;
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_tick_after_pause_is_suppressed() {
        let (mut controller, notifier) = controller(1);
        controller.set_paused(true);

        assert!(!controller.on_tick().await);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_now_respects_pause() {
        let (mut controller, notifier) = controller(60);

        assert!(controller.trigger_now().await);
        assert_eq!(notifier.count(), 1);

        controller.set_paused(true);
        assert!(!controller.trigger_now().await);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_now_keeps_the_schedule() {
        let (mut controller, notifier) = controller(1);
        run_for(&mut controller, Duration::from_secs(30)).await;
        controller.trigger_now().await;

        run_for(&mut controller, Duration::from_secs(30) + Duration::from_millis(1)).await;
        assert_eq!(notifier.count(), 2);
        assert_eq!(controller.timers_started(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_uses_the_configured_interval() {
        let (mut controller, notifier) = controller(60);
        controller.set_interval(2);
        controller.set_paused(true);
        run_for(&mut controller, MINUTE * 10).await;

        let snapshot = controller.set_paused(false);
        assert_eq!(snapshot.interval_minutes, 2);
        assert!(snapshot.timer_active);

        run_for(&mut controller, MINUTE * 2 + Duration::from_millis(1)).await;
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_while_paused_does_not_start_a_timer() {
        let (mut controller, _) = controller(60);
        controller.set_paused(true);

        let snapshot = controller.set_interval(15);
        assert!(snapshot.paused);
        assert!(!controller.has_timer());
        assert_eq!(controller.config().interval_ms(), 15 * 60_000);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_change_restarts_the_period() {
        let (mut controller, notifier) = controller(1);
        run_for(&mut controller, Duration::from_secs(50)).await;

        controller.set_interval(1);
        run_for(&mut controller, Duration::from_secs(50)).await;
        assert_eq!(notifier.count(), 0);

        run_for(&mut controller, Duration::from_secs(10) + Duration::from_millis(1)).await;
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_never_leaves_more_than_one_timer() {
        let (mut controller, _) = controller(10);

        for round in 0..25 {
            let paused = round % 2 == 0;
            controller.set_paused(paused);
            assert_eq!(controller.has_timer(), !paused);
            assert_eq!(controller.is_paused(), paused);
        }
        controller.set_paused(false);
        controller.set_paused(false);
        assert!(controller.has_timer());
        // One initial timer plus one per resume.
        assert_eq!(controller.timers_started(), 1 + 13);
    }

    #[tokio::test(start_paused = true)]
    async fn same_value_pause_is_a_state_noop() {
        let (mut controller, _) = controller(10);
        let before = controller.snapshot();
        let after = controller.set_paused(false);

        assert_eq!(before, after);
        assert_eq!(controller.timers_started(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn notifier_failures_do_not_stop_the_timer() {
        let mut controller = ReminderController::new(
            ReminderConfig::from_minutes(1),
            Arc::new(FailingNotifier),
        );

        run_for(&mut controller, MINUTE * 3 + Duration::from_millis(1)).await;
        assert!(controller.has_timer());
        assert_eq!(controller.reminders_shown(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_releases_the_timer() {
        let (mut controller, _) = controller(1);
        controller.shutdown();
        assert!(!controller.has_timer());
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_interval_is_clamped() {
        let (mut controller, _) = controller(60);
        assert_eq!(controller.set_interval(0).interval_minutes, 1);
        assert_eq!(controller.set_interval(500).interval_minutes, 180);
    }
}
