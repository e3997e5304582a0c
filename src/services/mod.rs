//! External collaborators
//!
//! Desktop notifications and the update backend, each behind a trait so the
//! dispatch loop can be driven by test doubles.

pub mod notifier;
pub mod updater;

pub use notifier::{DesktopNotifier, Notifier};
pub use updater::{FeedUpdateService, UpdateService, CURRENT_VERSION};
