//! repo::seed
//!
//! Starter fixture: a minimal but complete repository to provision into.
//!
//! # Design
//!
//! `sw seed` and the integration tests need a repository that already
//! carries the pre-agreed content model: a content parent, a sites folder,
//! a language catalog with registered entries, and the two blueprints.
//! [`starter`] builds exactly that and returns the matching
//! [`EngineConfig`] so the well-known identifiers line up.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::core::types::{BlueprintId, NodeId, TemplateId, LAYOUT_FIELD};

use super::node::{Blueprint, BlueprintNode};
use super::memory::Repository;

/// A freshly seeded repository with its matching configuration.
#[derive(Debug, Clone)]
pub struct Seeded {
    /// The repository itself.
    pub repo: Repository,
    /// Configuration whose identifiers point into `repo`.
    pub config: EngineConfig,
    /// The content parent new sites are provisioned under.
    pub content: NodeId,
    /// The sites folder holding site definitions.
    pub sites: NodeId,
    /// The language catalog root.
    pub catalog: NodeId,
}

/// Registered catalog languages in the starter fixture.
pub const SEED_LANGUAGES: [&str; 2] = ["en", "es-US"];

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Build the starter repository and its configuration.
pub fn starter() -> Seeded {
    let repo = Repository::new();

    let folder_template = TemplateId::generate();
    let site_root_template = TemplateId::generate();
    let page_template = TemplateId::generate();
    let settings_template = TemplateId::generate();
    let language_template = TemplateId::generate();
    let definition_template = TemplateId::generate();
    let reference_template = TemplateId::generate();

    let content = repo.create_root("Content", folder_template);
    let sites = repo.create_root("Sites", folder_template);
    let catalog = repo.create_root("Languages", folder_template);
    for language in SEED_LANGUAGES {
        repo.create_node(catalog, language, language_template)
            .unwrap_or_else(|_| unreachable!("catalog root is unrestricted"));
    }

    let default_layout =
        r#"{"devices":{"default":[{"rendering":"hero","placeholder":"main"}]}}"#;

    let content_root_blueprint = Blueprint {
        id: BlueprintId::generate(),
        name: "Site Root".to_string(),
        root: BlueprintNode {
            name: "$name".to_string(),
            template: site_root_template,
            shared_fields: fields(&[("Icon", "globe")]),
            fields: fields(&[("Title", "$name"), (LAYOUT_FIELD, default_layout)]),
            children: vec![
                BlueprintNode {
                    name: "Home".to_string(),
                    template: page_template,
                    shared_fields: BTreeMap::new(),
                    fields: fields(&[
                        ("Title", "Home"),
                        ("Body", "Welcome to $name"),
                        (LAYOUT_FIELD, default_layout),
                    ]),
                    children: Vec::new(),
                },
                BlueprintNode {
                    name: "Site Settings".to_string(),
                    template: settings_template,
                    shared_fields: BTreeMap::new(),
                    fields: fields(&[("Languages", "")]),
                    children: Vec::new(),
                },
            ],
        },
    };

    let site_definition_blueprint = Blueprint {
        id: BlueprintId::generate(),
        name: "Site Definition".to_string(),
        root: BlueprintNode {
            name: "$name".to_string(),
            template: definition_template,
            shared_fields: BTreeMap::new(),
            fields: fields(&[("hostName", ""), ("language", "")]),
            children: vec![BlueprintNode {
                name: "siteSettings".to_string(),
                template: reference_template,
                shared_fields: BTreeMap::new(),
                fields: fields(&[("Value", "")]),
                children: Vec::new(),
            }],
        },
    };

    let config = EngineConfig {
        content_root_blueprint: content_root_blueprint.id,
        site_definition_blueprint: site_definition_blueprint.id,
        sites_folder: sites,
        site_settings_template: settings_template,
        language_catalog: catalog,
    };

    repo.register_blueprint(content_root_blueprint);
    repo.register_blueprint(site_definition_blueprint);

    Seeded {
        repo,
        config,
        content,
        sites,
        catalog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_wires_config_to_repo() {
        let seeded = starter();
        assert!(seeded.repo.exists(seeded.config.sites_folder));
        assert!(seeded.repo.exists(seeded.config.language_catalog));
        assert!(seeded
            .repo
            .blueprint(seeded.config.content_root_blueprint)
            .is_some());
        assert!(seeded
            .repo
            .blueprint(seeded.config.site_definition_blueprint)
            .is_some());
    }

    #[test]
    fn catalog_carries_seed_languages() {
        let seeded = starter();
        let names: Vec<_> = seeded
            .repo
            .child_nodes(seeded.catalog)
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, vec!["en", "es-US"]);
    }
}
