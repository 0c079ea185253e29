//! config::schema
//!
//! Engine configuration schema.
//!
//! # Design
//!
//! The engine never hard-codes the well-known identifiers of the content
//! model it provisions into. They are pre-agreed with the repository's
//! content model and supplied as configuration:
//!
//! ```toml
//! content_root_blueprint = "{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}"
//! site_definition_blueprint = "{24E0DA61-288B-4872-9D5C-D264230E9A93}"
//! sites_folder = "{67E6AF74-8A3F-4E69-B325-32887B63A25F}"
//! site_settings_template = "{33A1164D-7E9C-47FF-AA5F-1713A1B6B08E}"
//! language_catalog = "{64C4F646-A3FA-4205-B98E-4DE2C609B60F}"
//! ```
//!
//! Identifier validity is enforced by the typed deserializers in
//! [`crate::core::types`]; a config that parses is a config that is valid.

use serde::{Deserialize, Serialize};

use crate::core::types::{BlueprintId, NodeId, TemplateId};

/// Well-known identifiers the engine provisions against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Blueprint producing a new content root subtree.
    pub content_root_blueprint: BlueprintId,

    /// Blueprint producing a new site-definition subtree.
    pub site_definition_blueprint: BlueprintId,

    /// Folder under which site definitions are created.
    pub sites_folder: NodeId,

    /// Template identifying a content root's settings child.
    pub site_settings_template: TemplateId,

    /// Root node of the language catalog.
    pub language_catalog: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip() {
        let config = EngineConfig {
            content_root_blueprint: BlueprintId::generate(),
            site_definition_blueprint: BlueprintId::generate(),
            sites_folder: NodeId::generate(),
            site_settings_template: TemplateId::generate(),
            language_catalog: NodeId::generate(),
        };

        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn braced_identifiers_accepted() {
        let raw = r#"
            content_root_blueprint = "{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}"
            site_definition_blueprint = "{24E0DA61-288B-4872-9D5C-D264230E9A93}"
            sites_folder = "{67E6AF74-8A3F-4E69-B325-32887B63A25F}"
            site_settings_template = "{33A1164D-7E9C-47FF-AA5F-1713A1B6B08E}"
            language_catalog = "{64C4F646-A3FA-4205-B98E-4DE2C609B60F}"
        "#;
        let parsed: EngineConfig = toml::from_str(raw).unwrap();
        assert_eq!(
            parsed.sites_folder.to_string(),
            "{67E6AF74-8A3F-4E69-B325-32887B63A25F}"
        );
    }

    #[test]
    fn unknown_fields_rejected() {
        let raw = r#"
            content_root_blueprint = "{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}"
            site_definition_blueprint = "{24E0DA61-288B-4872-9D5C-D264230E9A93}"
            sites_folder = "{67E6AF74-8A3F-4E69-B325-32887B63A25F}"
            site_settings_template = "{33A1164D-7E9C-47FF-AA5F-1713A1B6B08E}"
            language_catalog = "{64C4F646-A3FA-4205-B98E-4DE2C609B60F}"
            surprise = true
        "#;
        assert!(toml::from_str::<EngineConfig>(raw).is_err());
    }

    #[test]
    fn malformed_identifier_rejected() {
        let raw = r#"
            content_root_blueprint = "not-an-id"
            site_definition_blueprint = "{24E0DA61-288B-4872-9D5C-D264230E9A93}"
            sites_folder = "{67E6AF74-8A3F-4E69-B325-32887B63A25F}"
            site_settings_template = "{33A1164D-7E9C-47FF-AA5F-1713A1B6B08E}"
            language_catalog = "{64C4F646-A3FA-4205-B98E-4DE2C609B60F}"
        "#;
        assert!(toml::from_str::<EngineConfig>(raw).is_err());
    }
}
