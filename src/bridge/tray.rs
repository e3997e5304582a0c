//! Tray menu model
//!
//! The menu is derived from the pause flag and rebuilt whenever a reminder
//! snapshot is published, so the pause/resume label always matches.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{error::ReminderError, messages::Command};

pub const TRAY_TOOLTIP: &str = "Stand-up reminder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrayItem {
    #[serde(rename = "show")]
    ShowMainWindow,
    TogglePause,
    CheckUpdates,
    Quit,
}

impl TrayItem {
    /// What activating this item asks for, given the current pause flag
    pub fn action(self, paused: bool) -> TrayAction {
        match self {
            TrayItem::ShowMainWindow => TrayAction::ShowMainWindow,
            TrayItem::TogglePause => TrayAction::Send(Command::SetPaused(!paused)),
            TrayItem::CheckUpdates => TrayAction::Send(Command::RequestCheck),
            TrayItem::Quit => TrayAction::Quit,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "show" => Some(TrayItem::ShowMainWindow),
            "toggle-pause" => Some(TrayItem::TogglePause),
            "check-updates" => Some(TrayItem::CheckUpdates),
            "quit" => Some(TrayItem::Quit),
            _ => None,
        }
    }
}

/// What activating a tray item asks for
#[derive(Debug, Clone, PartialEq)]
pub enum TrayAction {
    Send(Command),
    ShowMainWindow,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub item: TrayItem,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrayMenu {
    pub tooltip: String,
    pub entries: Vec<MenuEntry>,
    pub paused: bool,
}

impl TrayMenu {
    pub fn build(paused: bool) -> Self {
        let entry = |item, label: &str| MenuEntry {
            item,
            label: label.to_string(),
        };
        Self {
            tooltip: TRAY_TOOLTIP.to_string(),
            entries: vec![
                entry(TrayItem::ShowMainWindow, "Show main window"),
                entry(
                    TrayItem::TogglePause,
                    if paused {
                        "Resume reminders"
                    } else {
                        "Pause reminders"
                    },
                ),
                entry(TrayItem::CheckUpdates, "Check for updates"),
                entry(TrayItem::Quit, "Quit"),
            ],
            paused,
        }
    }

    pub fn label(&self, item: TrayItem) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.item == item)
            .map(|entry| entry.label.as_str())
    }
}

/// Tray icon with its current context menu
#[derive(Debug, Clone)]
pub struct Tray {
    menu: TrayMenu,
    rebuilds: u64,
}

impl Tray {
    /// Load the tray for the given icon asset
    pub fn load(icon: impl AsRef<Path>) -> Result<Self, ReminderError> {
        let icon = icon.as_ref();
        if !icon.is_file() {
            return Err(ReminderError::ResourceUnavailable(icon.to_path_buf()));
        }

        info!("Tray icon loaded from {}", icon.display());
        Ok(Self {
            menu: TrayMenu::build(false),
            rebuilds: 0,
        })
    }

    pub fn menu(&self) -> &TrayMenu {
        &self.menu
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Replace the menu for the given pause state
    pub fn rebuild(&mut self, paused: bool) {
        self.menu = TrayMenu::build(paused);
        self.rebuilds += 1;
        debug!("Tray menu rebuilt (paused={})", paused);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn label_follows_pause_state() {
        assert_eq!(
            TrayMenu::build(false).label(TrayItem::TogglePause),
            Some("Pause reminders")
        );
        assert_eq!(
            TrayMenu::build(true).label(TrayItem::TogglePause),
            Some("Resume reminders")
        );
    }

    #[test]
    fn menu_carries_the_tooltip() {
        assert_eq!(TrayMenu::build(true).tooltip, TRAY_TOOLTIP);
    }

    #[test]
    fn menu_has_four_items_in_order() {
        let items: Vec<TrayItem> = TrayMenu::build(false)
            .entries
            .iter()
            .map(|entry| entry.item)
            .collect();
        assert_eq!(
            items,
            vec![
                TrayItem::ShowMainWindow,
                TrayItem::TogglePause,
                TrayItem::CheckUpdates,
                TrayItem::Quit,
            ]
        );
    }

    #[test]
    fn toggle_flips_the_current_state() {
        assert_eq!(
            TrayItem::TogglePause.action(false),
            TrayAction::Send(Command::SetPaused(true))
        );
        assert_eq!(
            TrayItem::TogglePause.action(true),
            TrayAction::Send(Command::SetPaused(false))
        );
    }

    #[test]
    fn missing_icon_is_resource_unavailable() {
        let err = Tray::load("/definitely/not/here/icon.png").unwrap_err();
        assert!(matches!(err, ReminderError::ResourceUnavailable(_)));
    }

    #[test]
    fn rebuild_counts_even_without_change() {
        let icon = NamedTempFile::new().unwrap();
        let mut tray = Tray::load(icon.path()).unwrap();

        tray.rebuild(false);
        tray.rebuild(false);
        assert_eq!(tray.rebuilds(), 2);

        tray.rebuild(true);
        assert_eq!(tray.menu().label(TrayItem::TogglePause), Some("Resume reminders"));
    }

    #[test]
    fn item_names_parse() {
        assert_eq!(TrayItem::parse("show"), Some(TrayItem::ShowMainWindow));
        assert_eq!(TrayItem::parse("toggle-pause"), Some(TrayItem::TogglePause));
        assert_eq!(TrayItem::parse("nope"), None);
    }
}
