//! core::locale
//!
//! Locale resolution for culture validation.
//!
//! # Design
//!
//! A language identifier is *culturally valid* if it resolves to a known
//! locale form independent of any repository state. Resolution here is
//! syntactic: the tag must parse as `language[-Script][-REGION]` per
//! [`crate::core::types::LanguageTag`]. Region and script subtags are
//! normalized into the resolved [`Locale`] so callers can display the
//! canonical form.
//!
//! This deliberately does not consult the repository's language catalog;
//! catalog registration is a separate check performed by
//! [`crate::engine::languages`].

use thiserror::Error;

use super::types::{LanguageTag, TypeError};

/// Errors from locale resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// The identifier does not denote any known locale form.
    #[error("culture not found: {0}")]
    NotFound(String),
}

/// A resolved locale: normalized subtags of a valid language identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// Lowercase primary language subtag (`en`, `es`).
    pub language: String,
    /// Title-case script subtag, if present (`Hans`).
    pub script: Option<String>,
    /// Uppercase region subtag, if present (`US`, `419`).
    pub region: Option<String>,
}

impl Locale {
    /// The canonical tag form, e.g. `zh-Hans-CN`.
    pub fn canonical(&self) -> String {
        let mut out = self.language.clone();
        if let Some(script) = &self.script {
            out.push('-');
            out.push_str(script);
        }
        if let Some(region) = &self.region {
            out.push('-');
            out.push_str(region);
        }
        out
    }
}

/// Resolve a language identifier to a known locale.
///
/// # Errors
///
/// Returns [`LocaleError::NotFound`] if the identifier is malformed.
pub fn resolve(identifier: &str) -> Result<Locale, LocaleError> {
    // Syntactic validation first; anything LanguageTag rejects is unknown.
    LanguageTag::new(identifier).map_err(|e| match e {
        TypeError::InvalidLanguageTag(tag) => LocaleError::NotFound(tag),
        other => LocaleError::NotFound(other.to_string()),
    })?;

    let mut subtags = identifier.split('-');
    let language = subtags
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut script = None;
    let mut region = None;
    for subtag in subtags {
        if subtag.len() == 4 {
            let mut s = subtag.to_ascii_lowercase();
            if let Some(first) = s.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            script = Some(s);
        } else {
            region = Some(subtag.to_ascii_uppercase());
        }
    }

    Ok(Locale {
        language,
        script,
        region,
    })
}
