//! core
//!
//! Core domain types for Sitewright.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeId, TemplateId, BlueprintId, LanguageTag
//! - [`locale`] - Locale resolution for culture validation
//! - [`layout`] - Composite layout field value and its merge semantics
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Validation happens at construction time, never at use sites

pub mod layout;
pub mod locale;
pub mod types;
