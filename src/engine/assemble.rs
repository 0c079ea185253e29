//! engine::assemble
//!
//! Site graph assembler: content root, site definition, and the
//! cross-references tying them together.
//!
//! # Design
//!
//! Two subtrees are created independently (content root under the chosen
//! parent, site definition under the sites folder) and then wired
//! together in a second phase: the definition's `language` field points at
//! the primary language's catalog entry, and its `siteSettings` child
//! points at the content root's settings node.
//!
//! Reference wiring is best-effort by policy: any single lookup miss
//! (absent settings node, absent catalog entry) silently skips that one
//! enrichment step and the overall assembly still succeeds. Validation of
//! the language list happened before assembly started.

use crate::config::EngineConfig;
use crate::core::types::{LanguageTag, NodeId, LIST_DELIMITER};
use crate::repo::security::PrivilegeSuspension;
use crate::repo::{ContentNode, RepoError, Repository};
use crate::ui::Notifier;

use super::blueprint::{instantiate, InstantiateError};

/// Assembles the node graph of one new site.
pub struct Assembler<'a> {
    repo: &'a Repository,
    config: &'a EngineConfig,
    notifier: &'a dyn Notifier,
    principal: &'a str,
    baseline: &'a LanguageTag,
}

impl<'a> Assembler<'a> {
    /// Create an assembler for one provisioning run.
    pub fn new(
        repo: &'a Repository,
        config: &'a EngineConfig,
        notifier: &'a dyn Notifier,
        principal: &'a str,
        baseline: &'a LanguageTag,
    ) -> Self {
        Assembler {
            repo,
            config,
            notifier,
            principal,
            baseline,
        }
    }

    /// Create the content root under `parent` from the content-root
    /// blueprint.
    ///
    /// Returns `Ok(None)` if the blueprint is missing; the user has
    /// already been alerted.
    pub fn create_content_root(
        &self,
        parent: NodeId,
        site_name: &str,
    ) -> Result<Option<NodeId>, RepoError> {
        self.instantiate_or_alert(self.config.content_root_blueprint, parent, site_name)
    }

    /// Create the site definition under the sites folder and wire its
    /// cross-references to `content_root`.
    ///
    /// A missing blueprint alerts and returns `Ok(())`; reference lookup
    /// misses are silently skipped.
    pub fn create_site_definition(
        &self,
        site_name: &str,
        host_names: &str,
        primary_language: &str,
        content_root: NodeId,
    ) -> Result<(), RepoError> {
        let definition = match self.instantiate_or_alert(
            self.config.site_definition_blueprint,
            self.config.sites_folder,
            site_name,
        )? {
            Some(definition) => definition,
            None => return Ok(()),
        };

        let _suspension = PrivilegeSuspension::new();

        let mut edit = self.repo.begin_edit(definition, self.baseline)?;
        edit.set_field("hostName", host_names);
        if let Some(entry) = self.catalog_descendant(primary_language) {
            edit.set_field("language", entry.id.to_string());
        }
        edit.commit()?;

        // Second phase: point the definition's siteSettings child at the
        // content root's settings node. Either lookup may miss.
        let settings_ref = self
            .repo
            .child_nodes(definition)
            .into_iter()
            .find(|child| child.name == "siteSettings");
        if let Some(settings_ref) = settings_ref {
            if let Some(settings) = self.settings_child(content_root) {
                let mut edit = self.repo.begin_edit(settings_ref.id, self.baseline)?;
                edit.set_field("Value", settings.id.to_string());
                edit.commit()?;
            }
        }
        Ok(())
    }

    /// Record the enabled-language list on the content root's settings
    /// node: matching catalog entry ids joined with the fixed delimiter.
    ///
    /// Languages with no catalog entry are dropped from the joined list;
    /// a content root without a settings node is left alone.
    pub fn set_site_settings_languages(
        &self,
        content_root: NodeId,
        languages: &[String],
    ) -> Result<(), RepoError> {
        let settings = match self.settings_child(content_root) {
            Some(settings) => settings,
            None => return Ok(()),
        };

        let entries = self.repo.child_nodes(self.config.language_catalog);
        let ids: Vec<String> = languages
            .iter()
            .filter_map(|language| {
                entries
                    .iter()
                    .find(|entry| entry.name.eq_ignore_ascii_case(language))
                    .map(|entry| entry.id.to_string())
            })
            .collect();
        let joined = ids.join(&LIST_DELIMITER.to_string());

        let _suspension = PrivilegeSuspension::new();
        let mut edit = self.repo.begin_edit(settings.id, self.baseline)?;
        edit.set_field("Languages", joined);
        edit.commit()
    }

    fn instantiate_or_alert(
        &self,
        blueprint: crate::core::types::BlueprintId,
        parent: NodeId,
        name: &str,
    ) -> Result<Option<NodeId>, RepoError> {
        match instantiate(self.repo, blueprint, parent, name, self.baseline, self.principal) {
            Ok(node) => Ok(Some(node)),
            Err(InstantiateError::BlueprintMissing(id)) => {
                self.notifier
                    .alert(&format!("{} blueprint was not found.", id), None);
                Ok(None)
            }
            Err(InstantiateError::Repo(e)) => Err(e),
        }
    }

    /// First settings node under `content_root`, matched by template id.
    fn settings_child(&self, content_root: NodeId) -> Option<ContentNode> {
        self.repo
            .child_nodes(content_root)
            .into_iter()
            .find(|child| child.template == self.config.site_settings_template)
    }

    /// Catalog entry matching `language` among all catalog descendants,
    /// case-insensitive.
    fn catalog_descendant(&self, language: &str) -> Option<ContentNode> {
        self.repo
            .descendants(self.config.language_catalog)
            .into_iter()
            .filter_map(|id| self.repo.node(id))
            .find(|node| node.name.eq_ignore_ascii_case(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::NodeId;
    use crate::repo::seed;
    use crate::ui::RecordingNotifier;

    struct Fixture {
        seeded: seed::Seeded,
        notifier: RecordingNotifier,
        baseline: LanguageTag,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                seeded: seed::starter(),
                notifier: RecordingNotifier::new(),
                baseline: LanguageTag::new("en").unwrap(),
            }
        }

        fn assembler(&self) -> Assembler<'_> {
            Assembler::new(
                &self.seeded.repo,
                &self.seeded.config,
                &self.notifier,
                "admin",
                &self.baseline,
            )
        }

        fn provision_root(&self) -> NodeId {
            self.assembler()
                .create_content_root(self.seeded.content, "Website A")
                .unwrap()
                .unwrap()
        }
    }

    #[test]
    fn content_root_created_under_parent() {
        let fx = Fixture::new();
        let root = fx.provision_root();
        let node = fx.seeded.repo.node(root).unwrap();
        assert_eq!(node.name, "Website A");
        assert_eq!(node.parent, Some(fx.seeded.content));
    }

    #[test]
    fn missing_blueprint_alerts_instead_of_failing() {
        let fx = Fixture::new();
        let mut config = fx.seeded.config.clone();
        config.content_root_blueprint = crate::core::types::BlueprintId::generate();
        let assembler = Assembler::new(
            &fx.seeded.repo,
            &config,
            &fx.notifier,
            "admin",
            &fx.baseline,
        );

        let result = assembler
            .create_content_root(fx.seeded.content, "Website A")
            .unwrap();
        assert!(result.is_none());
        let alerts = fx.notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("blueprint was not found"));
    }

    #[test]
    fn site_definition_wired_to_content_root() {
        let fx = Fixture::new();
        let root = fx.provision_root();
        fx.assembler()
            .create_site_definition("Website A", "a.example.com", "en", root)
            .unwrap();

        let repo = &fx.seeded.repo;
        let definition = repo
            .child_nodes(fx.seeded.sites)
            .into_iter()
            .find(|n| n.name == "Website A")
            .unwrap();
        assert_eq!(
            repo.field_value(definition.id, &fx.baseline, "hostName")
                .as_deref(),
            Some("a.example.com")
        );

        // language field references the en catalog entry
        let en_entry = repo
            .child_nodes(fx.seeded.catalog)
            .into_iter()
            .find(|n| n.name == "en")
            .unwrap();
        assert_eq!(
            repo.field_value(definition.id, &fx.baseline, "language")
                .as_deref(),
            Some(en_entry.id.to_string().as_str())
        );

        // siteSettings child references the root's settings node
        let settings = repo
            .child_nodes(root)
            .into_iter()
            .find(|n| n.template == fx.seeded.config.site_settings_template)
            .unwrap();
        let settings_ref = repo
            .child_nodes(definition.id)
            .into_iter()
            .find(|n| n.name == "siteSettings")
            .unwrap();
        assert_eq!(
            repo.field_value(settings_ref.id, &fx.baseline, "Value")
                .as_deref(),
            Some(settings.id.to_string().as_str())
        );
    }

    #[test]
    fn unknown_primary_language_leaves_field_unset() {
        let fx = Fixture::new();
        let root = fx.provision_root();
        fx.assembler()
            .create_site_definition("Website A", "a.example.com", "fr", root)
            .unwrap();

        let definition = fx
            .seeded
            .repo
            .child_nodes(fx.seeded.sites)
            .into_iter()
            .find(|n| n.name == "Website A")
            .unwrap();
        // Blueprint default is an empty string; the miss is silent.
        assert_eq!(
            fx.seeded
                .repo
                .field_value(definition.id, &fx.baseline, "language")
                .as_deref(),
            Some("")
        );
        assert!(fx.notifier.alerts().is_empty());
    }

    #[test]
    fn settings_languages_joined_with_delimiter() {
        let fx = Fixture::new();
        let root = fx.provision_root();
        fx.assembler()
            .set_site_settings_languages(
                root,
                &["en".to_string(), "es-US".to_string()],
            )
            .unwrap();

        let repo = &fx.seeded.repo;
        let settings = repo
            .child_nodes(root)
            .into_iter()
            .find(|n| n.template == fx.seeded.config.site_settings_template)
            .unwrap();
        let entries = repo.child_nodes(fx.seeded.catalog);
        let expected = format!(
            "{}|{}",
            entries.iter().find(|n| n.name == "en").unwrap().id,
            entries.iter().find(|n| n.name == "es-US").unwrap().id,
        );
        assert_eq!(
            repo.field_value(settings.id, &fx.baseline, "Languages")
                .as_deref(),
            Some(expected.as_str())
        );
    }

    #[test]
    fn unmatched_languages_dropped_from_joined_list() {
        let fx = Fixture::new();
        let root = fx.provision_root();
        fx.assembler()
            .set_site_settings_languages(
                root,
                &["en".to_string(), "fr".to_string()],
            )
            .unwrap();

        let repo = &fx.seeded.repo;
        let settings = repo
            .child_nodes(root)
            .into_iter()
            .find(|n| n.template == fx.seeded.config.site_settings_template)
            .unwrap();
        let en_entry = repo
            .child_nodes(fx.seeded.catalog)
            .into_iter()
            .find(|n| n.name == "en")
            .unwrap();
        assert_eq!(
            repo.field_value(settings.id, &fx.baseline, "Languages")
                .as_deref(),
            Some(en_entry.id.to_string().as_str())
        );
    }

    #[test]
    fn missing_settings_node_is_silently_skipped() {
        let fx = Fixture::new();
        // A bare node with no settings child.
        let bare = fx
            .seeded
            .repo
            .create_node(
                fx.seeded.content,
                "Bare",
                crate::core::types::TemplateId::generate(),
            )
            .unwrap();
        assert!(fx
            .assembler()
            .set_site_settings_languages(bare, &["en".to_string()])
            .is_ok());
    }
}
