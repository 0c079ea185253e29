//! engine::languages
//!
//! Language registry adapter: the two read-only gates that run before any
//! provisioning mutation.
//!
//! # Design
//!
//! Two distinct checks, deliberately separate:
//!
//! - [`validate_cultures`] asks whether each identifier denotes a known
//!   locale at all, independent of repository state.
//! - [`languages_registered`] asks whether each identifier is registered
//!   as a child entry of the repository's language catalog node.
//!
//! Neither check mutates state or creates missing languages. The catalog
//! node is an explicit parameter, never ambient context.

use crate::core::locale;
use crate::core::types::NodeId;
use crate::repo::Repository;

/// True if every requested identifier resolves to a known locale.
///
/// The first failure is recorded in the repository's error log; the check
/// does not mutate any node.
pub fn validate_cultures(repo: &Repository, requested: &[String]) -> bool {
    for identifier in requested {
        if let Err(e) = locale::resolve(identifier) {
            repo.log_error(&format!(
                "culture check failed for language {:?}: {}",
                identifier, e
            ));
            return false;
        }
    }
    true
}

/// True if every requested identifier names a child entry of the language
/// catalog node.
///
/// A missing or childless catalog fails the check outright. Matching is
/// case-insensitive on entry names.
pub fn languages_registered(
    repo: &Repository,
    catalog: NodeId,
    requested: &[String],
) -> bool {
    let entries = repo.child_nodes(catalog);
    if entries.is_empty() {
        return false;
    }
    requested.iter().all(|language| {
        entries
            .iter()
            .any(|entry| entry.name.eq_ignore_ascii_case(language))
    })
}
