//! repo::memory
//!
//! The single doorway to the content store.
//!
//! # Architecture
//!
//! The [`Repository`] struct is the only way to read or mutate content
//! nodes. No other module holds node state directly. This ensures:
//!
//! - Consistent error handling across all store operations
//! - Write restrictions enforced in exactly one place
//! - All-or-nothing application of guarded edits
//!
//! The store is in-memory and serializable: [`Repository::to_snapshot`]
//! and [`Repository::from_snapshot`] round-trip the full state (nodes,
//! blueprints, restrictions, audit log) through a serde document, which is
//! how the CLI persists a repository between invocations.
//!
//! # Error Handling
//!
//! Store errors are categorized into typed variants:
//! - [`RepoError::NodeNotFound`]: no node with the given identifier
//! - [`RepoError::AccessDenied`]: write restriction active and not suspended
//! - [`RepoError::NoVersion`]: edit attempted on a version-less language
//! - [`RepoError::Layout`]: composite layout value failed to parse
//! - [`RepoError::Snapshot`]: snapshot (de)serialization or I/O failure

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::layout::{LayoutError, LayoutValue};
use crate::core::types::{
    BlueprintId, LanguageTag, NodeId, TemplateId, VersionNumber, LAYOUT_FIELD,
};

use super::audit::{AuditEntry, AuditLog, ErrorEntry};
use super::bulk::BulkUpdate;
use super::edit::{PendingWrite, VersionEdit};
use super::node::{Blueprint, ContentNode, FieldEntry, Item, Version};
use super::security;

/// Errors from content store operations.
#[derive(Debug, Error)]
pub enum RepoError {
    /// No node with the given identifier.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A write restriction is active and no suspension scope is open.
    #[error("write access denied for {node}")]
    AccessDenied {
        /// The restricted node, formatted as `name ({ID})`.
        node: String,
    },

    /// An edit was opened on a (node, language) pair with no versions.
    #[error("{node} has no version in language {language}")]
    NoVersion {
        /// The node, formatted as `name ({ID})`.
        node: String,
        /// The version-less language.
        language: LanguageTag,
    },

    /// The composite layout field held a malformed value.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Snapshot (de)serialization or I/O failure.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Serializable full state of a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All nodes, parent-before-child not required.
    pub nodes: Vec<ContentNode>,
    /// Registered blueprints.
    #[serde(default)]
    pub blueprints: Vec<Blueprint>,
    /// Nodes whose writes require an open suspension scope.
    #[serde(default)]
    pub restricted: Vec<NodeId>,
    /// Nodes under which the acting principal may not create children.
    #[serde(default)]
    pub create_denied: Vec<NodeId>,
    /// Audit trail carried across invocations.
    #[serde(default)]
    pub audit: AuditLog,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<NodeId, ContentNode>,
    blueprints: BTreeMap<BlueprintId, Blueprint>,
    restricted: BTreeSet<NodeId>,
    create_denied: BTreeSet<NodeId>,
    audit: AuditLog,
    /// Derived path index; rebuilt lazily outside bulk scopes.
    paths: BTreeMap<NodeId, String>,
    paths_stale: bool,
    bulk_depth: u32,
}

/// The single doorway to the in-memory content store.
///
/// Cloning is cheap and shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    inner: Arc<Mutex<Inner>>,
}

impl Repository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Structure

    /// Create a parentless root node. Roots are fixture points (content
    /// root folder, sites folder, language catalog) and are not subject to
    /// write restrictions at creation time.
    pub fn create_root(&self, name: impl Into<String>, template: TemplateId) -> NodeId {
        let mut inner = self.lock();
        let id = NodeId::generate();
        inner.nodes.insert(
            id,
            ContentNode {
                id,
                name: name.into(),
                template,
                parent: None,
                children: Vec::new(),
                shared_fields: BTreeMap::new(),
                versions: BTreeMap::new(),
            },
        );
        Self::mark_dirty(&mut inner);
        id
    }

    /// Create a child node under `parent`.
    ///
    /// New nodes are always appended, so the tree is acyclic and
    /// single-owner by construction.
    ///
    /// # Errors
    ///
    /// Fails if `parent` does not exist or is write-restricted without an
    /// open suspension scope.
    pub fn create_node(
        &self,
        parent: NodeId,
        name: impl Into<String>,
        template: TemplateId,
    ) -> Result<NodeId, RepoError> {
        let mut inner = self.lock();
        Self::ensure_writable(&inner, parent)?;
        if !inner.nodes.contains_key(&parent) {
            return Err(RepoError::NodeNotFound(parent));
        }

        let id = NodeId::generate();
        inner.nodes.insert(
            id,
            ContentNode {
                id,
                name: name.into(),
                template,
                parent: Some(parent),
                children: Vec::new(),
                shared_fields: BTreeMap::new(),
                versions: BTreeMap::new(),
            },
        );
        if let Some(parent_node) = inner.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Self::mark_dirty(&mut inner);
        Ok(id)
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: NodeId) -> Option<ContentNode> {
        self.lock().nodes.get(&id).cloned()
    }

    /// True if a node with this identifier exists.
    pub fn exists(&self, id: NodeId) -> bool {
        self.lock().nodes.contains_key(&id)
    }

    /// Language-scoped view of a node.
    pub fn item(&self, id: NodeId, language: &LanguageTag) -> Option<Item> {
        let inner = self.lock();
        let node = inner.nodes.get(&id)?;
        Some(Item {
            id: node.id,
            name: node.name.clone(),
            template: node.template,
            language: language.clone(),
            version_count: node.version_count(language),
        })
    }

    /// Ordered children of a node, as full node clones.
    pub fn child_nodes(&self, id: NodeId) -> Vec<ContentNode> {
        let inner = self.lock();
        inner
            .nodes
            .get(&id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| inner.nodes.get(child).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All descendants of a node in depth-first order, excluding the node
    /// itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let inner = self.lock();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = inner
            .nodes
            .get(&id)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = inner.nodes.get(&next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Full path of a node, e.g. `/Content/Website A/Site Settings`.
    ///
    /// Served from a derived index; rebuilt lazily outside bulk scopes.
    pub fn node_path(&self, id: NodeId) -> Option<String> {
        let mut inner = self.lock();
        if inner.paths_stale && inner.bulk_depth == 0 {
            Self::rebuild_paths(&mut inner);
        }
        inner.paths.get(&id).cloned()
    }

    // ------------------------------------------------------------------
    // Versions and fields

    /// Create a new version of `id` in `language`.
    ///
    /// The new version clones the latest existing version in that
    /// language, or starts empty as version 1. Numbers stay dense.
    ///
    /// # Errors
    ///
    /// Fails if the node does not exist or is write-restricted without an
    /// open suspension scope.
    pub fn add_version(
        &self,
        id: NodeId,
        language: &LanguageTag,
    ) -> Result<VersionNumber, RepoError> {
        let mut inner = self.lock();
        Self::ensure_writable(&inner, id)?;
        let node = inner
            .nodes
            .get_mut(&id)
            .ok_or(RepoError::NodeNotFound(id))?;

        let versions = node.versions.entry(language.clone()).or_default();
        let next = match versions.last() {
            Some(latest) => Version {
                number: latest.number.next(),
                fields: latest.fields.clone(),
            },
            None => Version {
                number: VersionNumber::FIRST,
                fields: BTreeMap::new(),
            },
        };
        let number = next.number;
        versions.push(next);
        Ok(number)
    }

    /// Read every field of a node as seen from `language`: shared fields
    /// plus the latest version's per-language fields, fully materialized
    /// and sorted by name.
    pub fn read_all_fields(
        &self,
        id: NodeId,
        language: &LanguageTag,
    ) -> Result<Vec<FieldEntry>, RepoError> {
        let inner = self.lock();
        let node = inner.nodes.get(&id).ok_or(RepoError::NodeNotFound(id))?;

        let mut merged: BTreeMap<String, FieldEntry> = BTreeMap::new();
        for (name, value) in &node.shared_fields {
            merged.insert(
                name.clone(),
                FieldEntry {
                    name: name.clone(),
                    value: value.clone(),
                    shared: true,
                },
            );
        }
        if let Some(version) = node.latest_version(language) {
            for (name, value) in &version.fields {
                merged.insert(
                    name.clone(),
                    FieldEntry {
                        name: name.clone(),
                        value: value.clone(),
                        shared: false,
                    },
                );
            }
        }
        Ok(merged.into_values().collect())
    }

    /// Read one field value as seen from `language`: the latest version's
    /// value, falling back to the shared value.
    pub fn field_value(&self, id: NodeId, language: &LanguageTag, name: &str) -> Option<String> {
        let inner = self.lock();
        let node = inner.nodes.get(&id)?;
        node.latest_version(language)
            .and_then(|v| v.fields.get(name).cloned())
            .or_else(|| node.shared_fields.get(name).cloned())
    }

    /// Write one per-language field directly into the latest version.
    /// Fixture and seeding surface; engine writes go through guarded edits.
    pub fn set_field(
        &self,
        id: NodeId,
        language: &LanguageTag,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RepoError> {
        let mut inner = self.lock();
        Self::ensure_writable(&inner, id)?;
        let node = inner
            .nodes
            .get_mut(&id)
            .ok_or(RepoError::NodeNotFound(id))?;
        let display = node.display();
        let version = node
            .latest_version_mut(language)
            .ok_or_else(|| RepoError::NoVersion {
                node: display,
                language: language.clone(),
            })?;
        version.fields.insert(name.into(), value.into());
        Ok(())
    }

    /// Write one shared field on the node itself.
    pub fn set_shared_field(
        &self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), RepoError> {
        let mut inner = self.lock();
        Self::ensure_writable(&inner, id)?;
        let node = inner
            .nodes
            .get_mut(&id)
            .ok_or(RepoError::NodeNotFound(id))?;
        node.shared_fields.insert(name.into(), value.into());
        Ok(())
    }

    /// Open a guarded edit on the latest version of `(id, language)`.
    ///
    /// # Errors
    ///
    /// Fails if the node does not exist or has no version in `language`.
    pub fn begin_edit(
        &self,
        id: NodeId,
        language: &LanguageTag,
    ) -> Result<VersionEdit, RepoError> {
        {
            let inner = self.lock();
            let node = inner.nodes.get(&id).ok_or(RepoError::NodeNotFound(id))?;
            if node.version_count(language) == 0 {
                return Err(RepoError::NoVersion {
                    node: node.display(),
                    language: language.clone(),
                });
            }
        }
        Ok(VersionEdit::new(self.clone(), id, language.clone()))
    }

    /// Apply a committed edit's buffered writes, all or nothing.
    pub(crate) fn apply_edit(
        &self,
        id: NodeId,
        language: &LanguageTag,
        pending: &[PendingWrite],
    ) -> Result<(), RepoError> {
        let mut inner = self.lock();
        Self::ensure_writable(&inner, id)?;
        let node = inner
            .nodes
            .get_mut(&id)
            .ok_or(RepoError::NodeNotFound(id))?;

        // Stage against clones so a failing write leaves nothing behind.
        let mut shared = node.shared_fields.clone();
        let display = node.display();
        let mut version = node
            .latest_version(language)
            .cloned()
            .ok_or_else(|| RepoError::NoVersion {
                node: display,
                language: language.clone(),
            })?;

        for write in pending {
            match write {
                PendingWrite::Field { name, value } => {
                    if shared.contains_key(name) {
                        shared.insert(name.clone(), value.clone());
                    } else {
                        version.fields.insert(name.clone(), value.clone());
                    }
                }
                PendingWrite::Layout(incoming) => {
                    let current = version
                        .fields
                        .get(LAYOUT_FIELD)
                        .map(String::as_str)
                        .unwrap_or("");
                    let merged = LayoutValue::parse(current)?.merged_from(incoming);
                    version
                        .fields
                        .insert(LAYOUT_FIELD.to_string(), merged.to_field_string());
                }
            }
        }

        node.shared_fields = shared;
        if let Some(slot) = node.latest_version_mut(language) {
            *slot = version;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Blueprints

    /// Register a blueprint. Blueprints are read-only once registered.
    pub fn register_blueprint(&self, blueprint: Blueprint) {
        let mut inner = self.lock();
        inner.blueprints.insert(blueprint.id, blueprint);
    }

    /// Resolve a blueprint by identifier.
    pub fn blueprint(&self, id: BlueprintId) -> Option<Blueprint> {
        self.lock().blueprints.get(&id).cloned()
    }

    // ------------------------------------------------------------------
    // Restrictions and capabilities

    /// Mark a node write-restricted: mutations require an open
    /// [`security::PrivilegeSuspension`] scope.
    pub fn restrict(&self, id: NodeId) {
        self.lock().restricted.insert(id);
    }

    /// Deny the acting principal the create capability under `parent`.
    pub fn deny_create(&self, parent: NodeId) {
        self.lock().create_denied.insert(parent);
    }

    /// True if the acting principal may create children under `parent`.
    /// Consumes only capability presence; policy lives elsewhere.
    pub fn can_create(&self, parent: NodeId) -> bool {
        let inner = self.lock();
        inner.nodes.contains_key(&parent) && !inner.create_denied.contains(&parent)
    }

    // ------------------------------------------------------------------
    // Audit and errors

    /// Record an audited action keyed by principal and the node acted
    /// under.
    pub fn audit(&self, principal: &str, action: &str, node: NodeId) {
        let mut inner = self.lock();
        let formatted = inner
            .nodes
            .get(&node)
            .map(ContentNode::display)
            .unwrap_or_else(|| node.to_string());
        inner.audit.audit(principal, action, &formatted);
    }

    /// Record a recovered failure in the error log.
    pub fn log_error(&self, message: &str) {
        self.lock().audit.error(message);
    }

    /// Audit trail, oldest first.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.lock().audit.entries().to_vec()
    }

    /// Error log, oldest first.
    pub fn error_log(&self) -> Vec<ErrorEntry> {
        self.lock().audit.errors().to_vec()
    }

    // ------------------------------------------------------------------
    // Bulk scope

    /// Open a bulk-update scope deferring derived-index maintenance.
    pub fn bulk_update(&self) -> BulkUpdate {
        BulkUpdate::new(self.clone())
    }

    pub(crate) fn enter_bulk(&self) {
        let mut inner = self.lock();
        inner.bulk_depth += 1;
    }

    pub(crate) fn exit_bulk(&self) {
        let mut inner = self.lock();
        inner.bulk_depth = inner.bulk_depth.saturating_sub(1);
        if inner.bulk_depth == 0 && inner.paths_stale {
            Self::rebuild_paths(&mut inner);
        }
    }

    // ------------------------------------------------------------------
    // Snapshots

    /// Serialize the full repository state.
    pub fn to_snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            nodes: inner.nodes.values().cloned().collect(),
            blueprints: inner.blueprints.values().cloned().collect(),
            restricted: inner.restricted.iter().copied().collect(),
            create_denied: inner.create_denied.iter().copied().collect(),
            audit: inner.audit.clone(),
        }
    }

    /// Rebuild a repository from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut inner = Inner {
            nodes: snapshot.nodes.into_iter().map(|n| (n.id, n)).collect(),
            blueprints: snapshot
                .blueprints
                .into_iter()
                .map(|b| (b.id, b))
                .collect(),
            restricted: snapshot.restricted.into_iter().collect(),
            create_denied: snapshot.create_denied.into_iter().collect(),
            audit: snapshot.audit,
            ..Inner::default()
        };
        Self::rebuild_paths(&mut inner);
        Repository {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Load a repository from a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Snapshot`] on I/O or parse failure.
    pub fn load(path: &Path) -> Result<Self, RepoError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RepoError::Snapshot(format!("{}: {}", path.display(), e)))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| RepoError::Snapshot(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Save the repository to a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Snapshot`] on I/O or serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), RepoError> {
        let snapshot = self.to_snapshot();
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| RepoError::Snapshot(e.to_string()))?;
        std::fs::write(path, raw)
            .map_err(|e| RepoError::Snapshot(format!("{}: {}", path.display(), e)))
    }

    // ------------------------------------------------------------------
    // Internals

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_writable(inner: &Inner, id: NodeId) -> Result<(), RepoError> {
        if inner.restricted.contains(&id) && !security::is_suspended() {
            let node = inner
                .nodes
                .get(&id)
                .map(ContentNode::display)
                .unwrap_or_else(|| id.to_string());
            return Err(RepoError::AccessDenied { node });
        }
        Ok(())
    }

    fn mark_dirty(inner: &mut Inner) {
        if inner.bulk_depth > 0 {
            inner.paths_stale = true;
        } else {
            Self::rebuild_paths(inner);
        }
    }

    fn rebuild_paths(inner: &mut Inner) {
        fn path_of(nodes: &BTreeMap<NodeId, ContentNode>, id: NodeId) -> String {
            let mut segments = Vec::new();
            let mut cursor = Some(id);
            while let Some(current) = cursor {
                match nodes.get(&current) {
                    Some(node) => {
                        segments.push(node.name.clone());
                        cursor = node.parent;
                    }
                    None => break,
                }
            }
            segments.reverse();
            format!("/{}", segments.join("/"))
        }

        inner.paths = inner
            .nodes
            .keys()
            .map(|&id| (id, path_of(&inner.nodes, id)))
            .collect();
        inner.paths_stale = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::security::PrivilegeSuspension;

    fn en() -> LanguageTag {
        LanguageTag::new("en").unwrap()
    }

    #[test]
    fn descendants_are_depth_first() {
        let repo = Repository::new();
        let t = TemplateId::generate();
        let root = repo.create_root("root", t);
        let a = repo.create_node(root, "a", t).unwrap();
        let a1 = repo.create_node(a, "a1", t).unwrap();
        let b = repo.create_node(root, "b", t).unwrap();

        assert_eq!(repo.descendants(root), vec![a, a1, b]);
    }

    #[test]
    fn version_numbers_stay_dense() {
        let repo = Repository::new();
        let node = repo.create_root("n", TemplateId::generate());
        assert_eq!(repo.add_version(node, &en()).unwrap().get(), 1);
        assert_eq!(repo.add_version(node, &en()).unwrap().get(), 2);
        assert_eq!(repo.add_version(node, &en()).unwrap().get(), 3);
    }

    #[test]
    fn new_version_clones_latest_fields() {
        let repo = Repository::new();
        let node = repo.create_root("n", TemplateId::generate());
        repo.add_version(node, &en()).unwrap();
        repo.set_field(node, &en(), "Title", "v1 title").unwrap();

        repo.add_version(node, &en()).unwrap();
        assert_eq!(
            repo.field_value(node, &en(), "Title").as_deref(),
            Some("v1 title")
        );
    }

    #[test]
    fn first_version_starts_empty() {
        let repo = Repository::new();
        let node = repo.create_root("n", TemplateId::generate());
        repo.add_version(node, &en()).unwrap();
        assert!(repo.read_all_fields(node, &en()).unwrap().is_empty());
    }

    #[test]
    fn restricted_node_rejects_unsuspended_writes() {
        let repo = Repository::new();
        let node = repo.create_root("n", TemplateId::generate());
        repo.restrict(node);

        assert!(matches!(
            repo.add_version(node, &en()),
            Err(RepoError::AccessDenied { .. })
        ));

        let _guard = PrivilegeSuspension::new();
        assert!(repo.add_version(node, &en()).is_ok());
    }

    #[test]
    fn can_create_consumes_capability_presence() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        assert!(repo.can_create(parent));

        repo.deny_create(parent);
        assert!(!repo.can_create(parent));
        assert!(!repo.can_create(NodeId::generate()));
    }

    #[test]
    fn begin_edit_requires_a_version() {
        let repo = Repository::new();
        let node = repo.create_root("n", TemplateId::generate());
        assert!(matches!(
            repo.begin_edit(node, &en()),
            Err(RepoError::NoVersion { .. })
        ));
    }

    #[test]
    fn snapshot_roundtrip_preserves_everything() {
        let repo = Repository::new();
        let t = TemplateId::generate();
        let root = repo.create_root("Content", t);
        let child = repo.create_node(root, "Site", t).unwrap();
        repo.add_version(child, &en()).unwrap();
        repo.set_field(child, &en(), "Title", "Hello").unwrap();
        repo.set_shared_field(child, "Icon", "star").unwrap();
        repo.restrict(child);
        repo.audit("admin", "create website root", root);

        let restored = Repository::from_snapshot(repo.to_snapshot());
        assert_eq!(
            restored.field_value(child, &en(), "Title").as_deref(),
            Some("Hello")
        );
        assert_eq!(
            restored.field_value(child, &en(), "Icon").as_deref(),
            Some("star")
        );
        assert_eq!(restored.node_path(child).as_deref(), Some("/Content/Site"));
        assert_eq!(restored.audit_entries().len(), 1);
        assert!(matches!(
            restored.add_version(child, &en()),
            Err(RepoError::AccessDenied { .. })
        ));
    }

    #[test]
    fn snapshot_file_roundtrip() {
        let repo = Repository::new();
        let root = repo.create_root("Content", TemplateId::generate());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.json");
        repo.save(&path).unwrap();

        let restored = Repository::load(&path).unwrap();
        assert!(restored.exists(root));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Repository::load(Path::new("/nonexistent/repo.json")).unwrap_err();
        assert!(matches!(err, RepoError::Snapshot(_)));
    }
}
