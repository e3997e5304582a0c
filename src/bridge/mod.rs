//! UI-facing side
//!
//! Validation and translation of user actions, the display projection, and
//! the tray menu model. No decisions are made here beyond input validation.

pub mod display;
pub mod tray;
pub mod ui;

pub use display::{render, DisplayState};
pub use tray::{Tray, TrayAction, TrayItem, TrayMenu};
pub use ui::{parse_interval, UiBridge, UserAction, View};
