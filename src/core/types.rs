//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeId`] - Opaque, globally unique content node identifier
//! - [`TemplateId`] - Identifier of a node template
//! - [`BlueprintId`] - Identifier of a structural blueprint (branch template)
//! - [`LanguageTag`] - Validated BCP-47-like language identifier
//! - [`VersionNumber`] - 1-based, dense version number within a (node, language) pair
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use sitewright::core::types::{LanguageTag, NodeId};
//!
//! let tag = LanguageTag::new("es-US").unwrap();
//! assert_eq!(tag.as_str(), "es-US");
//!
//! let id = NodeId::parse("{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}").unwrap();
//! assert_eq!(id.to_string(), "{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}");
//!
//! assert!(LanguageTag::new("not a tag").is_err());
//! assert!(NodeId::parse("not-an-id").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Delimiter used both for raw language lists and for the joined
/// catalog-entry ids written into the settings `Languages` field.
pub const LIST_DELIMITER: char = '|';

/// Prefix marking repository-internal (system) fields.
pub const SYSTEM_FIELD_PREFIX: &str = "__";

/// Name of the composite layout field. System-prefixed, but explicitly
/// propagated across languages via structured merge rather than raw copy.
pub const LAYOUT_FIELD: &str = "__renderings";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid language tag: {0}")]
    InvalidLanguageTag(String),
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from its braced-uppercase display form
            /// (`{04D330F9-...}`) or a bare uuid.
            pub fn parse(s: &str) -> Result<Self, TypeError> {
                let trimmed = s.trim_start_matches('{').trim_end_matches('}');
                Uuid::parse_str(trimmed)
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId(s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{{{}}}", self.0.hyphenated().to_string().to_uppercase())
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }
    };
}

id_type! {
    /// Identifier of a single content node.
    ///
    /// Displayed in the repository's braced-uppercase form so identifiers
    /// written into reference fields round-trip through [`NodeId::parse`].
    NodeId
}

id_type! {
    /// Identifier of a node template.
    TemplateId
}

id_type! {
    /// Identifier of a structural blueprint (branch template).
    BlueprintId
}

/// A validated BCP-47-like language tag.
///
/// Accepted shape is `language[-Script][-REGION]`:
/// - a 2-3 letter lowercase-folded primary subtag (`en`, `es`, `fil`)
/// - an optional 4-letter script subtag (`Latn`)
/// - an optional 2-letter region subtag (`US`) or 3-digit region (`419`)
///
/// The original casing is preserved; comparisons that must be
/// case-insensitive use [`LanguageTag::matches`].
///
/// # Example
///
/// ```
/// use sitewright::core::types::LanguageTag;
///
/// let tag = LanguageTag::new("es-US").unwrap();
/// assert!(tag.matches("ES-us"));
/// assert!(LanguageTag::new("").is_err());
/// assert!(LanguageTag::new("e").is_err());
/// assert!(LanguageTag::new("en-USA-x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a new validated language tag.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidLanguageTag` if the tag is not of the
    /// `language[-Script][-REGION]` shape.
    pub fn new(tag: impl Into<String>) -> Result<Self, TypeError> {
        let tag = tag.into();
        Self::validate(&tag)?;
        Ok(Self(tag))
    }

    fn validate(tag: &str) -> Result<(), TypeError> {
        let invalid = || TypeError::InvalidLanguageTag(tag.to_string());

        let mut subtags = tag.split('-');
        let primary = subtags.next().ok_or_else(invalid)?;
        if !(2..=3).contains(&primary.len())
            || !primary.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        for subtag in subtags {
            let is_script =
                subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic());
            let is_region = (subtag.len() == 2
                && subtag.chars().all(|c| c.is_ascii_alphabetic()))
                || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()));
            if !is_script && !is_region {
                return Err(invalid());
            }
        }

        Ok(())
    }

    /// The tag as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against an arbitrary string.
    ///
    /// Language catalog entries are matched by name without regard to
    /// case, mirroring how catalog lookups behave during assembly.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageTag {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageTag> for String {
    fn from(tag: LanguageTag) -> Self {
        tag.0
    }
}

/// A 1-based version number within a (node, language) pair.
///
/// Version numbers are dense: the n-th version of a node in a language is
/// always numbered `n`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VersionNumber(u32);

impl VersionNumber {
    /// The first version of any (node, language) pair.
    pub const FIRST: VersionNumber = VersionNumber(1);

    /// The next version number after this one.
    pub fn next(self) -> VersionNumber {
        VersionNumber(self.0 + 1)
    }

    /// The raw 1-based number.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True if the field name marks a repository-internal (system) field.
pub fn is_system_field(name: &str) -> bool {
    name.starts_with(SYSTEM_FIELD_PREFIX)
}

/// Split a raw delimiter-separated language list, discarding empty entries.
///
/// This is the exact parse applied to user input before validation:
/// `"en||es-US|"` yields `["en", "es-US"]`.
pub fn split_language_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
