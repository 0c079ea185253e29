//! repo::node
//!
//! Content node and version data model.
//!
//! # Data Model
//!
//! - [`ContentNode`] - one addressable unit of the content tree: identity,
//!   template, tree edges, shared fields, and per-language version lists
//! - [`Version`] - a numbered snapshot of per-language field values
//! - [`Item`] - a language-scoped read view of a node
//! - [`FieldEntry`] - one field as seen during a full field read
//! - [`Blueprint`] / [`BlueprintNode`] - read-only structural templates
//!
//! # Invariants
//!
//! - Every node belongs to exactly one tree (single parent edge, no cycles)
//! - Version numbers are dense and 1-based per (node, language)
//! - Shared fields live on the node; per-language fields live on versions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{BlueprintId, LanguageTag, NodeId, TemplateId, VersionNumber};

/// A language-scoped, numbered snapshot of a node's per-language fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// 1-based version number, dense per (node, language).
    pub number: VersionNumber,
    /// Per-language field values.
    pub fields: BTreeMap<String, String>,
}

/// A single addressable unit in the content tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentNode {
    /// Globally unique identifier.
    pub id: NodeId,
    /// Node name, unique enough for display; child lookups by name are
    /// performed by the engine, not enforced here.
    pub name: String,
    /// Template this node was created from.
    pub template: TemplateId,
    /// Parent edge; `None` for tree roots.
    pub parent: Option<NodeId>,
    /// Ordered child references. The parent owns the children's existence,
    /// not their content.
    pub children: Vec<NodeId>,
    /// Shared fields: one value across all languages.
    pub shared_fields: BTreeMap<String, String>,
    /// Per-language version lists, ordered by version number.
    pub versions: BTreeMap<LanguageTag, Vec<Version>>,
}

impl ContentNode {
    /// Number of versions in the given language.
    pub fn version_count(&self, language: &LanguageTag) -> usize {
        self.versions.get(language).map_or(0, Vec::len)
    }

    /// The latest version in the given language, if any.
    pub fn latest_version(&self, language: &LanguageTag) -> Option<&Version> {
        self.versions.get(language).and_then(|v| v.last())
    }

    /// Mutable access to the latest version in the given language.
    pub(crate) fn latest_version_mut(
        &mut self,
        language: &LanguageTag,
    ) -> Option<&mut Version> {
        self.versions.get_mut(language).and_then(|v| v.last_mut())
    }

    /// Formatted as `name ({ID})` for audit entries and error messages.
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// One field as seen during a full field read of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Raw field value.
    pub value: String,
    /// True if the field is shared across all languages.
    pub shared: bool,
}

/// A language-scoped read view of a node.
///
/// Cheap snapshot handed out by the repository doorway; holds no lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Identifier of the underlying node.
    pub id: NodeId,
    /// Node name.
    pub name: String,
    /// Template of the underlying node.
    pub template: TemplateId,
    /// Language this view is scoped to.
    pub language: LanguageTag,
    /// Number of versions the node has in this language.
    pub version_count: usize,
}

impl Item {
    /// Formatted as `name ({ID})` for error messages.
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

/// One prototype node within a blueprint.
///
/// The literal `$name` in the node name or any default field value is
/// replaced with the instantiation name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintNode {
    /// Prototype name; `$name` is substituted at instantiation time.
    pub name: String,
    /// Template the materialized node will carry.
    pub template: TemplateId,
    /// Default shared field values.
    #[serde(default)]
    pub shared_fields: BTreeMap<String, String>,
    /// Default per-language field values, written into version 1 of the
    /// instantiation language.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Child prototypes, in order.
    #[serde(default)]
    pub children: Vec<BlueprintNode>,
}

/// A read-only structural template that materializes a subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    /// Blueprint identifier, resolved at instantiation time.
    pub id: BlueprintId,
    /// Human-readable blueprint name.
    pub name: String,
    /// Root prototype of the subtree this blueprint produces.
    pub root: BlueprintNode,
}
