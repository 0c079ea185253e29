//! repo::bulk
//!
//! Bulk-update scope: a performance hint, not a transaction.
//!
//! # Design
//!
//! Provisioning touches many nodes in one burst. While a [`BulkUpdate`]
//! guard is alive, the repository defers derived-index maintenance (the
//! path index) and rebuilds it once when the outermost guard drops.
//!
//! This scope provides no atomicity and no rollback: nodes created before
//! a mid-sequence failure remain persisted. The unit of atomicity is the
//! guarded edit in [`crate::repo::edit`].

use super::memory::Repository;

/// RAII guard batching derived-index maintenance.
///
/// Guards nest; the index is rebuilt when the outermost guard drops.
#[derive(Debug)]
pub struct BulkUpdate {
    repo: Repository,
}

impl BulkUpdate {
    pub(crate) fn new(repo: Repository) -> Self {
        repo.enter_bulk();
        BulkUpdate { repo }
    }
}

impl Drop for BulkUpdate {
    fn drop(&mut self) {
        self.repo.exit_bulk();
    }
}
