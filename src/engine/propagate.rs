//! engine::propagate
//!
//! Version propagation: replicate baseline content into other languages.
//!
//! # Algorithm
//!
//! For each requested language, every node of the subtree (descendants in
//! depth-first order, root appended last) is visited exactly once:
//!
//! 1. Resolve the node's target-language and baseline-language views.
//! 2. If either view is absent, or the baseline has zero versions, the
//!    walk obeys [`MissingBaselinePolicy`]: `Halt` stops the entire
//!    remaining node sequence for this language (the historically observed
//!    contract), `Skip` moves on to the next node.
//! 3. If the target has zero versions, version 1 is created.
//! 4. Under a guarded edit, every baseline field passes the propagation
//!    filter: the composite layout field always; otherwise only
//!    non-shared, non-system, non-blank-named fields.
//! 5. The layout field is recomposed through the structured merge setter;
//!    all other fields are copied verbatim. No propagated write creates a
//!    version.
//! 6. Commit. On any failure the edit is cancelled, the failure is logged
//!    with node, language and cause, and only the current node's
//!    propagation stops.
//!
//! # Invariants
//!
//! - A failed node keeps its last good state exactly (no partial writes)
//! - Re-running against an unchanged baseline produces no value drift
//! - Shared and system fields are never written by propagation

use crate::core::layout::LayoutValue;
use crate::core::types::{is_system_field, LanguageTag, NodeId, LAYOUT_FIELD};
use crate::repo::security::PrivilegeSuspension;
use crate::repo::{Item, RepoError, Repository};

/// What to do when a node has no baseline to propagate from.
///
/// `Halt` reproduces the historically observed contract: one un-versioned
/// baseline node terminates propagation for everything after it in
/// traversal order. `Skip` is the corrected skip-and-continue behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingBaselinePolicy {
    /// Stop the entire remaining node sequence for this language.
    #[default]
    Halt,
    /// Skip the node and continue with the rest of the subtree.
    Skip,
}

/// Propagate baseline versions of the whole subtree under `root` into
/// every requested language, in the caller-supplied language order.
pub fn propagate_versions(
    repo: &Repository,
    root: NodeId,
    languages: &[LanguageTag],
    baseline: &LanguageTag,
    policy: MissingBaselinePolicy,
) {
    for language in languages {
        add_versions_for_language(repo, root, language, baseline, policy);
    }
}

/// Propagate one language across the subtree under `root`.
///
/// Visits every descendant exactly once, root last. Failures never
/// escape: they are logged and the walk continues (or halts) per the
/// rules above.
pub fn add_versions_for_language(
    repo: &Repository,
    root: NodeId,
    language: &LanguageTag,
    baseline: &LanguageTag,
    policy: MissingBaselinePolicy,
) {
    let mut nodes = repo.descendants(root);
    nodes.push(root);

    for node in nodes {
        let target = repo.item(node, language);
        let source = repo.item(node, baseline);
        let (target, source) = match (target, source) {
            (Some(t), Some(s)) if s.version_count > 0 => (t, s),
            _ => match policy {
                MissingBaselinePolicy::Halt => return,
                MissingBaselinePolicy::Skip => continue,
            },
        };

        let _suspension = PrivilegeSuspension::new();
        if let Err(e) = propagate_node(repo, &target, &source, language, baseline) {
            repo.log_error(&format!(
                "failed to propagate {} into language {}: {}",
                target.display(),
                language,
                e
            ));
        }
    }
}

fn propagate_node(
    repo: &Repository,
    target: &Item,
    source: &Item,
    language: &LanguageTag,
    baseline: &LanguageTag,
) -> Result<(), RepoError> {
    if target.version_count == 0 {
        repo.add_version(target.id, language)?;
    }

    let mut edit = repo.begin_edit(target.id, language)?;
    // Full field read up front, so every lazily-held value is materialized
    // before iteration.
    let fields = repo.read_all_fields(source.id, baseline)?;

    for field in fields {
        if field.name == LAYOUT_FIELD {
            let layout = LayoutValue::parse(&field.value)?;
            edit.set_layout(layout);
        } else if !field.shared
            && !is_system_field(&field.name)
            && !field.name.trim().is_empty()
        {
            edit.set_field(field.name, field.value);
        }
    }

    edit.commit()
}
