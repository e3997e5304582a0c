//! Utility functions module
//!
//! Process-level plumbing: signals and application lifecycle.

pub mod lifecycle;
pub mod signals;

pub use lifecycle::{Lifecycle, WindowClosePolicy};
pub use signals::shutdown_signal;
