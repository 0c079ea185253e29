//! repo
//!
//! The content store: node model, guarded edits, restrictions, audit.
//!
//! # Modules
//!
//! - [`node`] - Content node, version, item view, blueprint data model
//! - [`memory`] - The [`Repository`] doorway and snapshot persistence
//! - [`edit`] - Guarded field edits (the unit of atomicity)
//! - [`security`] - Stack-scoped suspension of write restrictions
//! - [`bulk`] - Bulk-update scope (performance hint, no rollback)
//! - [`audit`] - Append-only audit trail and error log
//! - [`seed`] - Starter fixture: catalog, folders, blueprints
//!
//! # Design Principles
//!
//! - All node state lives behind the [`Repository`] doorway
//! - Mutations either fully apply or leave no trace
//! - Evidence (audit log) is recorded, never consulted for behavior

pub mod audit;
pub mod bulk;
pub mod edit;
pub mod memory;
pub mod node;
pub mod security;
pub mod seed;

pub use edit::VersionEdit;
pub use memory::{RepoError, Repository, Snapshot};
pub use node::{Blueprint, BlueprintNode, ContentNode, FieldEntry, Item, Version};
