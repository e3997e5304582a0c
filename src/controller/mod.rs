//! Background-side controllers
//!
//! Both controllers are owned by the dispatch loop and never shared.

pub mod reminder;
pub mod update;

pub use reminder::ReminderController;
pub use update::UpdateCoordinator;
