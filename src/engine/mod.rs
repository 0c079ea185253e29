//! engine
//!
//! Orchestrates the provisioning lifecycle:
//! Validate → Instantiate → Assemble → Propagate.
//!
//! # Modules
//!
//! - [`languages`] - Language registry adapter (culture + registration gates)
//! - [`blueprint`] - Branch instantiator
//! - [`assemble`] - Site graph assembler
//! - [`propagate`] - Field propagator (version replication)
//!
//! # Correctness Invariants
//!
//! 1. No mutation happens before both validation gates pass
//! 2. Each guarded edit either fully commits or leaves no trace
//! 3. Steps completed before a mid-sequence failure stay persisted;
//!    there is no rollback (the bulk scope is a performance hint only)
//! 4. Every failure path returns to the caller with a rejection reason or
//!    a partially-completed root identifier - nothing is fatal

pub mod assemble;
pub mod blueprint;
pub mod languages;
pub mod propagate;

use thiserror::Error;

use crate::config::EngineConfig;
use crate::core::types::{split_language_list, LanguageTag, NodeId};
use crate::repo::{RepoError, Repository};
use crate::ui::Notifier;

use assemble::Assembler;
pub use propagate::MissingBaselinePolicy;

/// One user-initiated provisioning request, already gathered and
/// syntactically complete.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Parent node the new content root is created under.
    pub parent: NodeId,
    /// Name of the new site; replaces `$name` in blueprints.
    pub site_name: String,
    /// Host names, written verbatim into the site definition.
    pub host_names: String,
    /// Raw delimiter-separated language list, e.g. `en|es-US`.
    pub languages: String,
    /// Baseline language whose versions are replicated.
    pub baseline: LanguageTag,
    /// Acting principal, recorded in the audit trail.
    pub principal: String,
    /// Behavior when a node has no baseline to propagate from.
    pub missing_baseline: MissingBaselinePolicy,
}

/// Why a provisioning request was rejected.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A culture code was malformed, the language list was empty, or the
    /// parent node does not exist.
    #[error("one of the language(s) is not a registered culture, or the parent node does not exist")]
    CultureOrParentInvalid,

    /// A well-formed language is absent from the language catalog.
    #[error("language(s) {0} are not registered in the language catalog")]
    LanguagesNotRegistered(String),

    /// The acting principal may not create children under the parent.
    #[error("no permission to create a site under {0}")]
    PermissionDenied(NodeId),

    /// The content-root blueprint was missing, so no root was created.
    #[error("the site root could not be created")]
    RootCreationFailed,

    /// The content store failed in a way the engine does not recover.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Provision a new site: validate, create the content root and site
/// definition, record enabled languages, replicate versions.
///
/// On success returns the new content root's identifier. Rejections
/// before any mutation leave the repository untouched; failures after the
/// root exists keep completed steps in place (append-only provisioning).
pub fn provision(
    repo: &Repository,
    config: &EngineConfig,
    notifier: &dyn Notifier,
    request: &ProvisionRequest,
) -> Result<NodeId, ProvisionError> {
    let languages = split_language_list(&request.languages);

    if languages.is_empty()
        || !languages::validate_cultures(repo, &languages)
        || !repo.exists(request.parent)
    {
        notifier.alert(
            "One of the language(s) is not registered, please register all the language(s) before creating the website",
            Some("Culture Code Missing"),
        );
        return Err(ProvisionError::CultureOrParentInvalid);
    }

    if !languages::languages_registered(repo, config.language_catalog, &languages) {
        notifier.alert(
            &format!(
                "One of the language(s) {} do not exist in the language catalog, please add the language(s) first before creating the website",
                request.languages
            ),
            Some("Languages Not Added"),
        );
        return Err(ProvisionError::LanguagesNotRegistered(
            request.languages.clone(),
        ));
    }

    if !repo.can_create(request.parent) {
        let name = repo
            .node(request.parent)
            .map(|n| n.name)
            .unwrap_or_else(|| request.parent.to_string());
        notifier.alert(
            &format!("You do not have permission to create a site at \"{}\".", name),
            None,
        );
        return Err(ProvisionError::PermissionDenied(request.parent));
    }

    let assembler = Assembler::new(
        repo,
        config,
        notifier,
        &request.principal,
        &request.baseline,
    );

    let root = {
        let _bulk = repo.bulk_update();
        let root = assembler.create_content_root(request.parent, &request.site_name)?;
        if let Some(root) = root {
            assembler.create_site_definition(
                &request.site_name,
                &request.host_names,
                &languages[0],
                root,
            )?;
            assembler.set_site_settings_languages(root, &languages)?;

            // Validation guarantees every entry parses as a tag.
            let tags: Vec<LanguageTag> = languages
                .iter()
                .filter_map(|language| LanguageTag::new(language.as_str()).ok())
                .collect();
            propagate::propagate_versions(
                repo,
                root,
                &tags,
                &request.baseline,
                request.missing_baseline,
            );
        }
        root
    };

    root.ok_or(ProvisionError::RootCreationFailed)
}
