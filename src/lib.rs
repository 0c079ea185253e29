//! Sitewright - site provisioning for hierarchical content repositories
//!
//! Sitewright provisions a new site subtree inside a versioned content
//! repository and replicates baseline-language content into any number of
//! additional languages.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Validate → Instantiate → Assemble → Propagate
//! - [`core`] - Domain types, locale resolution, layout values
//! - [`repo`] - Single doorway to the content store: nodes, versions,
//!   guarded edits, restrictions, audit
//! - [`config`] - Externally-configurable well-known identifiers
//! - [`ui`] - Output formatting and the user alert channel
//!
//! # Correctness Invariants
//!
//! Sitewright maintains the following invariants:
//!
//! 1. No mutation happens before the culture and registration gates pass
//! 2. All field writes flow through guarded edits that commit fully or
//!    leave no trace
//! 3. Shared and system fields are never written by propagation
//! 4. Provisioning is append-only: completed steps survive later failures

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod repo;
pub mod ui;
