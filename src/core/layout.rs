//! core::layout
//!
//! The composite layout field value.
//!
//! # Design
//!
//! The layout field holds structured presentation configuration: for each
//! device, an ordered list of rendering placements. Propagating it across
//! languages is a semantic merge, never a raw string copy: the source's
//! per-device entries are recomposed over whatever the target already has,
//! so devices configured only on the target survive propagation.
//!
//! Serialization is canonical (sorted device keys), so a merged value is
//! semantically equal to its source but not necessarily byte-identical to
//! the source's raw field string.
//!
//! # Example
//!
//! ```
//! use sitewright::core::layout::LayoutValue;
//!
//! let source = LayoutValue::parse(
//!     r#"{"devices":{"default":[{"rendering":"hero","placeholder":"main"}]}}"#,
//! ).unwrap();
//!
//! let merged = LayoutValue::default().merged_from(&source);
//! assert_eq!(merged.devices.len(), 1);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from layout parsing.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The raw field value is not a well-formed layout document.
    #[error("malformed layout value: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single rendering placement within a device layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    /// Name or id of the rendering component.
    pub rendering: String,
    /// Placeholder the rendering is bound to.
    pub placeholder: String,
    /// Opaque rendering parameters, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
}

/// Structured value of the composite layout field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutValue {
    /// Per-device ordered rendering lists, keyed by device name.
    #[serde(default)]
    pub devices: BTreeMap<String, Vec<Rendering>>,
}

impl LayoutValue {
    /// Parse a raw layout field string.
    ///
    /// An empty or all-whitespace string is an empty layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Malformed`] if the string is non-empty but
    /// not a well-formed layout document.
    pub fn parse(raw: &str) -> Result<Self, LayoutError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize to the canonical on-field string form.
    pub fn to_field_string(&self) -> String {
        // BTreeMap keys keep this deterministic.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Recompose this layout with the source's devices.
    ///
    /// Every device present on `source` replaces the same-named device
    /// here; devices only present on `self` are kept.
    pub fn merged_from(&self, source: &LayoutValue) -> LayoutValue {
        let mut devices = self.devices.clone();
        for (device, renderings) in &source.devices {
            devices.insert(device.clone(), renderings.clone());
        }
        LayoutValue { devices }
    }

    /// True if no device has any renderings configured.
    pub fn is_empty(&self) -> bool {
        self.devices.values().all(Vec::is_empty)
    }
}
