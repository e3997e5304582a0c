//! Translation of user actions into commands, and of events into the view

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::display::{minutes_label, render, DisplayState};
use crate::{
    error::ValidationError,
    messages::{Command, Event, ReminderEvent},
    state::{MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES},
};

/// Controls a user can operate in the main window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Raw text from the interval input
    SetInterval(String),
    ShowReminderNow,
    Pause,
    Resume,
    CheckForUpdates,
    DownloadUpdate,
    RestartToUpdate,
}

/// What the window currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(flatten)]
    pub display: DisplayState,
    pub pause_visible: bool,
    pub resume_visible: bool,
}

/// Parse interval input, accepting whole numbers in 1..=180
pub fn parse_interval(input: &str) -> Result<u32, ValidationError> {
    let minutes: i64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::IntervalNotNumeric {
            min: MIN_INTERVAL_MINUTES,
            max: MAX_INTERVAL_MINUTES,
        })?;

    if minutes < i64::from(MIN_INTERVAL_MINUTES) || minutes > i64::from(MAX_INTERVAL_MINUTES) {
        return Err(ValidationError::IntervalOutOfRange {
            min: MIN_INTERVAL_MINUTES,
            max: MAX_INTERVAL_MINUTES,
        });
    }
    Ok(minutes as u32)
}

/// UI-side bridge. The only state it keeps of its own is the mirrored pause
/// flag; everything else is the projection of the latest event.
#[derive(Debug, Clone, Default)]
pub struct UiBridge {
    paused: bool,
    display: DisplayState,
}

impl UiBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a user action into exactly one command. Invalid input
    /// produces no command; nothing changes until the command is sent.
    pub fn handle_action(&self, action: UserAction) -> Result<Command, ValidationError> {
        let command = match action {
            UserAction::SetInterval(input) => Command::SetInterval(parse_interval(&input)?),
            UserAction::ShowReminderNow => Command::TriggerNow,
            UserAction::Pause => Command::SetPaused(true),
            UserAction::Resume => Command::SetPaused(false),
            UserAction::CheckForUpdates => Command::RequestCheck,
            UserAction::DownloadUpdate => Command::RequestDownload,
            UserAction::RestartToUpdate => Command::RequestInstall,
        };
        debug!("User action mapped to {}", command.name());
        Ok(command)
    }

    /// Reflect a command that reached the dispatch loop
    pub fn command_sent(&mut self, command: &Command) {
        let status = match command {
            Command::SetInterval(minutes) => Some(format!(
                "Status: reminder interval set to {}",
                minutes_label(*minutes)
            )),
            Command::SetPaused(paused) => {
                self.paused = *paused;
                Some(if *paused {
                    "Status: reminders paused".to_string()
                } else {
                    "Status: reminders running".to_string()
                })
            }
            Command::RequestCheck => Some("Status: checking for updates...".to_string()),
            Command::RequestDownload => Some("Status: downloading update...".to_string()),
            Command::TriggerNow | Command::RequestInstall => None,
        };

        if let Some(status) = status {
            self.display = DisplayState::status(status);
        }
    }

    /// Project an inbound event onto the view
    pub fn apply_event(&mut self, event: &Event) {
        if let Event::Reminder(ReminderEvent::StateChanged(snapshot)) = event {
            self.paused = snapshot.paused;
        }
        if let Some(display) = render(event) {
            self.display = display;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn view(&self) -> View {
        View {
            display: self.display.clone(),
            pause_visible: !self.paused,
            resume_visible: self.paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        messages::{UpdateEvent, UpdateInfo},
        state::ReminderSnapshot,
    };

    #[test]
    fn interval_bounds() {
        assert_eq!(parse_interval("1"), Ok(1));
        assert_eq!(parse_interval(" 180 "), Ok(180));
        assert!(matches!(
            parse_interval("181"),
            Err(ValidationError::IntervalOutOfRange { .. })
        ));
        assert!(matches!(
            parse_interval("0"),
            Err(ValidationError::IntervalOutOfRange { .. })
        ));
        assert!(matches!(
            parse_interval("-3"),
            Err(ValidationError::IntervalOutOfRange { .. })
        ));
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        for input in ["", "abc", "12.5", "45min"] {
            assert!(
                matches!(
                    parse_interval(input),
                    Err(ValidationError::IntervalNotNumeric { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejected_interval_sends_nothing_and_changes_nothing() {
        let bridge = UiBridge::new();
        let before = bridge.view();

        let err = bridge
            .handle_action(UserAction::SetInterval("181".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a whole number between 1 and 180");
        assert_eq!(bridge.view(), before);
    }

    #[test]
    fn each_action_maps_to_one_command() {
        let bridge = UiBridge::new();
        let cases = [
            (UserAction::SetInterval("30".to_string()), Command::SetInterval(30)),
            (UserAction::ShowReminderNow, Command::TriggerNow),
            (UserAction::Pause, Command::SetPaused(true)),
            (UserAction::Resume, Command::SetPaused(false)),
            (UserAction::CheckForUpdates, Command::RequestCheck),
            (UserAction::DownloadUpdate, Command::RequestDownload),
            (UserAction::RestartToUpdate, Command::RequestInstall),
        ];
        for (action, expected) in cases {
            assert_eq!(bridge.handle_action(action).unwrap(), expected);
        }
    }

    #[test]
    fn pause_toggles_visible_controls() {
        let mut bridge = UiBridge::new();
        assert!(bridge.view().pause_visible);

        let command = bridge.handle_action(UserAction::Pause).unwrap();
        assert!(bridge.view().pause_visible);

        bridge.command_sent(&command);
        let view = bridge.view();
        assert!(!view.pause_visible);
        assert!(view.resume_visible);
        assert_eq!(view.display.status, "Status: reminders paused");
    }

    #[test]
    fn interval_status_uses_singular_for_one_minute() {
        let mut bridge = UiBridge::new();
        bridge.command_sent(&Command::SetInterval(1));
        assert_eq!(
            bridge.view().display.status,
            "Status: reminder interval set to 1 minute"
        );

        bridge.command_sent(&Command::SetInterval(45));
        assert_eq!(
            bridge.view().display.status,
            "Status: reminder interval set to 45 minutes"
        );
    }

    #[test]
    fn state_events_override_the_mirrored_flag() {
        let mut bridge = UiBridge::new();
        bridge.apply_event(&Event::from(ReminderEvent::StateChanged(ReminderSnapshot {
            paused: true,
            interval_minutes: 60,
            timer_active: false,
        })));
        assert!(bridge.is_paused());
        assert!(bridge.view().resume_visible);
    }

    #[test]
    fn latest_event_wins() {
        let mut bridge = UiBridge::new();
        bridge.apply_event(&Event::from(UpdateEvent::CheckingForUpdate));
        bridge.apply_event(&Event::from(UpdateEvent::UpdateNotAvailable(
            UpdateInfo::new("1.0.0"),
        )));
        assert_eq!(
            bridge.view().display.status,
            "Status: you are running the current version"
        );

        bridge.apply_event(&Event::from(ReminderEvent::ShowMainWindow));
        assert_eq!(
            bridge.view().display.status,
            "Status: you are running the current version"
        );
    }
}
