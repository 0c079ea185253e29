//! engine::blueprint
//!
//! Branch instantiator: materialize a blueprint subtree under a parent.
//!
//! # Design
//!
//! A blueprint is a read-only structural definition. Instantiation walks
//! the prototype tree depth-first, creating one node per prototype,
//! substituting `$name` in names and default field values, writing shared
//! defaults onto the node and per-language defaults into version 1 of the
//! instantiation language.
//!
//! The instantiator is the privileged executor of an already-authorized
//! request: creation runs under a [`PrivilegeSuspension`] scope so write
//! restrictions on the target subtree do not apply, and every
//! instantiation is audited keyed by the acting principal and the parent
//! node.

use thiserror::Error;

use crate::core::types::{BlueprintId, LanguageTag, NodeId};
use crate::repo::node::BlueprintNode;
use crate::repo::security::PrivilegeSuspension;
use crate::repo::{RepoError, Repository};

/// Errors from blueprint instantiation.
#[derive(Debug, Error)]
pub enum InstantiateError {
    /// No blueprint registered under the given identifier. Surfaced to the
    /// user as an alert, never a crash.
    #[error("{0} blueprint was not found")]
    BlueprintMissing(BlueprintId),

    /// The content store rejected a write.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Materialize the blueprint under `parent` as a subtree named `name`.
///
/// Version 1 of every created node is populated in `language` from the
/// blueprint's per-language defaults.
///
/// # Errors
///
/// Returns [`InstantiateError::BlueprintMissing`] if the blueprint id
/// resolves to nothing; the caller decides how to surface that.
pub fn instantiate(
    repo: &Repository,
    blueprint_id: BlueprintId,
    parent: NodeId,
    name: &str,
    language: &LanguageTag,
    principal: &str,
) -> Result<NodeId, InstantiateError> {
    let blueprint = repo
        .blueprint(blueprint_id)
        .ok_or(InstantiateError::BlueprintMissing(blueprint_id))?;

    repo.audit(
        principal,
        &format!("instantiate blueprint {}", blueprint.name),
        parent,
    );

    let _suspension = PrivilegeSuspension::new();
    let root = materialize(repo, &blueprint.root, parent, name, language)?;
    Ok(root)
}

fn materialize(
    repo: &Repository,
    prototype: &BlueprintNode,
    parent: NodeId,
    name: &str,
    language: &LanguageTag,
) -> Result<NodeId, RepoError> {
    let node_name = substitute(&prototype.name, name);
    let node = repo.create_node(parent, node_name, prototype.template)?;

    for (field, value) in &prototype.shared_fields {
        repo.set_shared_field(node, field, substitute(value, name))?;
    }

    if !prototype.fields.is_empty() {
        repo.add_version(node, language)?;
        for (field, value) in &prototype.fields {
            repo.set_field(node, language, field, substitute(value, name))?;
        }
    }

    for child in &prototype.children {
        materialize(repo, child, node, name, language)?;
    }
    Ok(node)
}

/// Replace the `$name` token with the instantiation name.
fn substitute(template: &str, name: &str) -> String {
    template.replace("$name", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TemplateId;
    use crate::repo::node::Blueprint;
    use std::collections::BTreeMap;

    fn en() -> LanguageTag {
        LanguageTag::new("en").unwrap()
    }

    fn simple_blueprint() -> Blueprint {
        let mut fields = BTreeMap::new();
        fields.insert("Title".to_string(), "$name".to_string());
        Blueprint {
            id: BlueprintId::generate(),
            name: "Site Root".to_string(),
            root: BlueprintNode {
                name: "$name".to_string(),
                template: TemplateId::generate(),
                shared_fields: BTreeMap::new(),
                fields,
                children: vec![BlueprintNode {
                    name: "Home".to_string(),
                    template: TemplateId::generate(),
                    shared_fields: BTreeMap::new(),
                    fields: BTreeMap::new(),
                    children: Vec::new(),
                }],
            },
        }
    }

    #[test]
    fn missing_blueprint_reported() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        let missing = BlueprintId::generate();

        let err = instantiate(&repo, missing, parent, "Website A", &en(), "admin")
            .unwrap_err();
        assert!(matches!(err, InstantiateError::BlueprintMissing(id) if id == missing));
        // Nothing was created.
        assert!(repo.child_nodes(parent).is_empty());
    }

    #[test]
    fn name_token_substituted_in_names_and_fields() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        let blueprint = simple_blueprint();
        let id = blueprint.id;
        repo.register_blueprint(blueprint);

        let root = instantiate(&repo, id, parent, "Website A", &en(), "admin").unwrap();
        let node = repo.node(root).unwrap();
        assert_eq!(node.name, "Website A");
        assert_eq!(
            repo.field_value(root, &en(), "Title").as_deref(),
            Some("Website A")
        );
        assert_eq!(repo.child_nodes(root)[0].name, "Home");
    }

    #[test]
    fn prototype_without_fields_gets_no_version() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        let blueprint = simple_blueprint();
        let id = blueprint.id;
        repo.register_blueprint(blueprint);

        let root = instantiate(&repo, id, parent, "Website A", &en(), "admin").unwrap();
        let home = repo.child_nodes(root)[0].id;
        assert_eq!(repo.item(home, &en()).unwrap().version_count, 0);
    }

    #[test]
    fn restricted_parent_writable_during_instantiation() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        repo.restrict(parent);
        let blueprint = simple_blueprint();
        let id = blueprint.id;
        repo.register_blueprint(blueprint);

        assert!(instantiate(&repo, id, parent, "Website A", &en(), "admin").is_ok());
    }

    #[test]
    fn instantiation_is_audited_with_principal_and_parent() {
        let repo = Repository::new();
        let parent = repo.create_root("Content", TemplateId::generate());
        let blueprint = simple_blueprint();
        let id = blueprint.id;
        repo.register_blueprint(blueprint);

        instantiate(&repo, id, parent, "Website A", &en(), "jane").unwrap();
        let entries = repo.audit_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].principal, "jane");
        assert!(entries[0].node.contains("Content"));
    }
}
