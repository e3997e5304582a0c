//! Background tasks module
//!
//! The dispatch loop that owns all reminder and update state, plus the
//! UI-side tasks that follow what it publishes.

pub mod dispatcher;
pub mod projection;

pub use dispatcher::{Dispatcher, DispatcherLinks};
pub use projection::{notification_click_task, tray_sync_task, ui_projection_task};
