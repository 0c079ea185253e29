//! repo::edit
//!
//! Guarded field edits: the unit of atomicity.
//!
//! # Architecture
//!
//! A [`VersionEdit`] is an open edit on the latest version of one
//! (node, language) pair. Writes are buffered on the guard and applied in
//! one step by [`VersionEdit::commit`]: either every buffered write lands,
//! or none do. Dropping the guard without committing cancels the edit and
//! discards all buffered writes, so a failure partway through field
//! copying leaves the target version exactly as it was.
//!
//! Committed writes never create a version; versions are only created
//! explicitly through [`crate::repo::Repository::add_version`].
//!
//! # State Machine
//!
//! Per (node, language): `NoVersion -> VersionCreated -> Editing ->
//! {Committed | Cancelled}`. Both outcomes are terminal for one edit; a
//! later edit re-enters `Editing` from `Committed`.
//!
//! # Example
//!
//! ```
//! use sitewright::core::types::{LanguageTag, TemplateId};
//! use sitewright::repo::Repository;
//!
//! let repo = Repository::new();
//! let en = LanguageTag::new("en").unwrap();
//! let home = repo.create_root("Home", TemplateId::generate());
//! repo.add_version(home, &en).unwrap();
//!
//! let mut edit = repo.begin_edit(home, &en).unwrap();
//! edit.set_field("Title", "Welcome");
//! edit.commit().unwrap();
//!
//! assert_eq!(repo.field_value(home, &en, "Title").as_deref(), Some("Welcome"));
//! ```

use crate::core::layout::LayoutValue;
use crate::core::types::{LanguageTag, NodeId};

use super::memory::{RepoError, Repository};

/// One buffered write inside an open edit.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    /// Raw value copy into a named field.
    Field { name: String, value: String },
    /// Structured recomposition of the composite layout field.
    Layout(LayoutValue),
}

/// An open, guarded edit on the latest version of one (node, language).
///
/// Dropping without [`commit`](VersionEdit::commit) cancels the edit.
#[derive(Debug)]
pub struct VersionEdit {
    repo: Repository,
    node: NodeId,
    language: LanguageTag,
    pending: Vec<PendingWrite>,
}

impl VersionEdit {
    pub(crate) fn new(repo: Repository, node: NodeId, language: LanguageTag) -> Self {
        VersionEdit {
            repo,
            node,
            language,
            pending: Vec::new(),
        }
    }

    /// The node under edit.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The language under edit.
    pub fn language(&self) -> &LanguageTag {
        &self.language
    }

    /// Buffer a raw value write.
    ///
    /// If the field is declared shared on the node, the shared value is
    /// updated at commit time; otherwise the write lands in the latest
    /// version's per-language fields.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pending.push(PendingWrite::Field {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Buffer a layout recomposition.
    ///
    /// At commit time the target's current layout is parsed and the
    /// source's devices are merged over it; this is never a raw string
    /// overwrite.
    pub fn set_layout(&mut self, layout: LayoutValue) {
        self.pending.push(PendingWrite::Layout(layout));
    }

    /// Commit the edit: apply every buffered write atomically.
    ///
    /// # Errors
    ///
    /// Returns an error and applies nothing if the node has vanished, a
    /// write restriction is not suspended, or the target's current layout
    /// value fails to parse.
    pub fn commit(self) -> Result<(), RepoError> {
        self.repo
            .apply_edit(self.node, &self.language, &self.pending)
    }

    /// Cancel the edit, discarding all buffered writes.
    ///
    /// Equivalent to dropping the guard; provided for call sites where the
    /// cancellation is a deliberate step.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::types::TemplateId;

    fn repo_with_versioned_node() -> (Repository, NodeId, LanguageTag) {
        let repo = Repository::new();
        let en = LanguageTag::new("en").unwrap();
        let node = repo.create_root("Home", TemplateId::generate());
        repo.add_version(node, &en).unwrap();
        (repo, node, en)
    }

    #[test]
    fn commit_applies_all_buffered_writes() {
        let (repo, node, en) = repo_with_versioned_node();

        let mut edit = repo.begin_edit(node, &en).unwrap();
        edit.set_field("Title", "Welcome");
        edit.set_field("Body", "Hello");
        edit.commit().unwrap();

        assert_eq!(repo.field_value(node, &en, "Title").as_deref(), Some("Welcome"));
        assert_eq!(repo.field_value(node, &en, "Body").as_deref(), Some("Hello"));
    }

    #[test]
    fn drop_discards_buffered_writes() {
        let (repo, node, en) = repo_with_versioned_node();

        let mut edit = repo.begin_edit(node, &en).unwrap();
        edit.set_field("Title", "Never");
        drop(edit);

        assert_eq!(repo.field_value(node, &en, "Title"), None);
    }

    #[test]
    fn layout_commit_recomposes_over_existing_value() {
        let (repo, node, en) = repo_with_versioned_node();
        repo.set_field(
            node,
            &en,
            crate::core::types::LAYOUT_FIELD,
            r#"{"devices":{"print":[{"rendering":"print-header","placeholder":"main"}]}}"#,
        )
        .unwrap();

        let mut incoming = LayoutValue::default();
        incoming.devices.insert(
            "default".to_string(),
            vec![crate::core::layout::Rendering {
                rendering: "hero".to_string(),
                placeholder: "main".to_string(),
                parameters: None,
            }],
        );

        let mut edit = repo.begin_edit(node, &en).unwrap();
        edit.set_layout(incoming);
        edit.commit().unwrap();

        let raw = repo
            .field_value(node, &en, crate::core::types::LAYOUT_FIELD)
            .unwrap();
        let merged = LayoutValue::parse(&raw).unwrap();
        assert!(merged.devices.contains_key("default"));
        assert!(merged.devices.contains_key("print"));
    }

    #[test]
    fn commit_is_all_or_nothing_on_malformed_target_layout() {
        let (repo, node, en) = repo_with_versioned_node();
        repo.set_field(node, &en, crate::core::types::LAYOUT_FIELD, "{broken")
            .unwrap();

        let mut edit = repo.begin_edit(node, &en).unwrap();
        edit.set_field("Title", "Never");
        edit.set_layout(LayoutValue::default());
        assert!(edit.commit().is_err());

        // The plain field buffered before the failing layout write must
        // not have survived.
        assert_eq!(repo.field_value(node, &en, "Title"), None);
    }

    #[test]
    fn shared_field_write_lands_on_the_node() {
        let (repo, node, en) = repo_with_versioned_node();
        repo.set_shared_field(node, "Icon", "star").unwrap();

        let mut edit = repo.begin_edit(node, &en).unwrap();
        edit.set_field("Icon", "moon");
        edit.commit().unwrap();

        let es = LanguageTag::new("es").unwrap();
        repo.add_version(node, &es).unwrap();
        // Shared value is visible from every language.
        assert_eq!(repo.field_value(node, &es, "Icon").as_deref(), Some("moon"));
        let fields: BTreeMap<_, _> = repo
            .read_all_fields(node, &en)
            .unwrap()
            .into_iter()
            .map(|f| (f.name, f.shared))
            .collect();
        assert_eq!(fields.get("Icon"), Some(&true));
    }
}
