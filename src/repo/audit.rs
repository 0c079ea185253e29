//! repo::audit
//!
//! Append-only audit trail and error log for engine mutations.
//!
//! # Architecture
//!
//! The audit log records what the engine intended and did: every blueprint
//! instantiation is keyed by the acting principal and the node it acted
//! under. The error log records recovered failures (cancelled edits,
//! rejected culture codes) with enough detail to diagnose them later.
//!
//! The log is evidence, not authority: it never drives behavior, and it is
//! persisted inside repository snapshots so a provisioning run leaves its
//! trace behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,
    /// The acting principal.
    pub principal: String,
    /// What was done, e.g. `create website root`.
    pub action: String,
    /// The node acted under, formatted as `name ({ID})`.
    pub node: String,
}

/// A recovered failure worth keeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
    /// Human-readable description naming the offending input.
    pub message: String,
}

/// Append-only audit trail plus error log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
    errors: Vec<ErrorEntry>,
}

impl AuditLog {
    /// Record an audited action.
    pub fn audit(&mut self, principal: &str, action: &str, node: &str) {
        self.entries.push(AuditEntry {
            timestamp: Utc::now(),
            principal: principal.to_string(),
            action: action.to_string(),
            node: node.to_string(),
        });
    }

    /// Record a recovered failure.
    pub fn error(&mut self, message: &str) {
        self.errors.push(ErrorEntry {
            timestamp: Utc::now(),
            message: message.to_string(),
        });
    }

    /// All audited actions, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// All recorded failures, oldest first.
    pub fn errors(&self) -> &[ErrorEntry] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_append_in_order() {
        let mut log = AuditLog::default();
        log.audit("admin", "create website root", "Content ({...})");
        log.audit("admin", "create site definition", "Sites ({...})");

        let actions: Vec<_> = log.entries().iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["create website root", "create site definition"]);
    }

    #[test]
    fn errors_kept_separately() {
        let mut log = AuditLog::default();
        log.error("culture not found: xx-!!");
        assert_eq!(log.entries().len(), 0);
        assert_eq!(log.errors().len(), 1);
        assert!(log.errors()[0].message.contains("xx-!!"));
    }
}
