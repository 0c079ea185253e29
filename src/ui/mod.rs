//! ui
//!
//! User interaction utilities: output formatting and the alert channel.

pub mod notify;
pub mod output;

pub use notify::{Alert, ConsoleNotifier, Notifier, RecordingNotifier};
pub use output::Verbosity;
