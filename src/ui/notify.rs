//! ui::notify
//!
//! The user-facing notification channel.
//!
//! # Design
//!
//! The engine reports input-validation failures and missing blueprints
//! through a single-string alert with an optional title. The channel is
//! fire-and-forget: it never returns a value the engine depends on, so a
//! discarded alert changes nothing about the outcome.
//!
//! [`ConsoleNotifier`] writes to stderr; [`RecordingNotifier`] captures
//! alerts for assertions in tests.

use std::sync::{Arc, Mutex};

use super::output;

/// Fire-and-forget alert channel.
pub trait Notifier {
    /// alert the user; `title` is an optional dialog caption.
    fn alert(&self, message: &str, title: Option<&str>);
}

/// Notifier writing alerts to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str, title: Option<&str>) {
        output::alert(message, title);
    }
}

/// One captured alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Alert body.
    pub message: String,
    /// Optional caption.
    pub title: Option<String>,
}

/// Notifier capturing alerts for test assertions.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share the
/// captured list.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured alerts, oldest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str, title: Option<&str>) {
        self.alerts.lock().unwrap().push(Alert {
            message: message.to_string(),
            title: title.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_captures_in_order() {
        let notifier = RecordingNotifier::new();
        notifier.alert("first", None);
        notifier.alert("second", Some("Caption"));

        let alerts = notifier.alerts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "first");
        assert_eq!(alerts[1].title.as_deref(), Some("Caption"));
    }

    #[test]
    fn clones_share_the_record() {
        let notifier = RecordingNotifier::new();
        let clone = notifier.clone();
        clone.alert("seen by both", None);
        assert_eq!(notifier.alerts().len(), 1);
    }
}
