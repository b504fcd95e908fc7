//! JSON deployment descriptors and the in-memory archive they describe.
//!
//! A descriptor lists the class-loading scopes, the archives of one
//! application, and the accessible edges between them:
//!
//! ```json
//! {
//!   "application": "shop",
//!   "scopes": [{ "id": "app" }, { "id": "war", "parent": "app" }],
//!   "archives": [
//!     { "id": "lib.jar", "scope": "app", "beans_xml": { "state": "empty" },
//!       "classes": [{ "name": "com.acme.Repo" }] },
//!     { "id": "shop.war", "kind": "web_module", "scope": "war",
//!       "accessible": ["lib.jar"],
//!       "classes": [{ "name": "com.acme.Cart",
//!                     "annotations": ["jakarta.enterprise.context.SessionScoped"] }] }
//!   ]
//! }
//! ```

use crate::cache::ExtensionClassCache;
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::model::ArchiveGraph;
use beanscope_api::{
    AnnotationName, ApiError, ApiResult, Archive, ArchiveId, ArchiveKind, BeansXml, ClassName,
    DiscoveryMode, LoadedClass, ScopeId,
};
use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct DeploymentDescriptor {
    pub application: String,
    #[serde(default)]
    pub config: DiscoveryConfig,
    #[serde(default)]
    pub scopes: Vec<ScopeSpec>,
    pub archives: Vec<ArchiveSpec>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ScopeSpec {
    pub id: ScopeId,
    #[serde(default)]
    pub parent: Option<ScopeId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct ArchiveSpec {
    pub id: ArchiveId,
    #[serde(default)]
    pub kind: ArchiveKind,
    pub scope: ScopeId,
    #[serde(default)]
    pub beans_xml: BeansXml,
    /// Overrides the mode derived from `beans_xml`.
    #[serde(default)]
    pub discovery_mode: Option<DiscoveryMode>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    /// Marker annotation types declared by this archive.
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub annotation_types: Vec<AnnotationName>,
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub extra_classes: Vec<ClassName>,
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub extension_classes: Vec<ClassName>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub main_class: Option<ClassName>,
    /// Ids of archives whose classes are visible to this one.
    #[serde(default)]
    pub accessible: Vec<ArchiveId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ClassSpec {
    #[schemars(with = "String")]
    pub name: ClassName,
    #[serde(default)]
    #[schemars(with = "Vec<String>")]
    pub annotations: Vec<AnnotationName>,
    /// Scope that actually defines the class when loaded through this
    /// archive. Defaults to the archive's own scope.
    #[serde(default)]
    pub defined_in: Option<ScopeId>,
    #[serde(default = "default_loadable")]
    pub loadable: bool,
}

fn default_loadable() -> bool {
    true
}

impl ClassSpec {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            defined_in: None,
            loadable: true,
        }
    }
}

impl DeploymentDescriptor {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn schema() -> schemars::Schema {
        schemars::schema_for!(DeploymentDescriptor)
    }

    /// Builds the archive graph. Scopes are registered first, then every
    /// archive, then the edges, so archives may refer to ones listed later.
    pub fn build_graph(&self, cache: Arc<ExtensionClassCache>) -> Result<ArchiveGraph> {
        let mut graph = ArchiveGraph::new(Arc::new(self.config.clone()), cache);

        let mut pending: Vec<&ScopeSpec> = self.scopes.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for spec in pending {
                match &spec.parent {
                    Some(parent) if !graph.scopes().contains(parent) => deferred.push(spec),
                    _ => graph.register_scope(spec.id.clone(), spec.parent.clone())?,
                }
            }
            if deferred.len() == before {
                let missing = deferred[0].parent.clone().unwrap_or_else(|| deferred[0].id.clone());
                return Err(DiscoveryError::UnknownScope(missing));
            }
            pending = deferred;
        }

        let mut seen = HashSet::new();
        for spec in &self.archives {
            if !seen.insert(&spec.id) {
                return Err(DiscoveryError::DuplicateArchive(spec.id.clone()));
            }
            graph.register_archive(Arc::new(StaticArchive::from_spec(spec)), &[])?;
        }
        for spec in &self.archives {
            for target in &spec.accessible {
                graph.add_edge(&spec.id, target)?;
            }
        }

        info!(
            "Loaded application {}: {} archives, {} edges",
            self.application,
            graph.len(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// In-memory [`Archive`] backed by an [`ArchiveSpec`].
#[derive(Debug, Clone)]
pub struct StaticArchive {
    id: ArchiveId,
    kind: ArchiveKind,
    scope: ScopeId,
    beans_xml: BeansXml,
    mode: Option<DiscoveryMode>,
    classes: IndexMap<ClassName, ClassSpec>,
    annotation_types: IndexSet<AnnotationName>,
    extra_classes: IndexSet<ClassName>,
    extension_classes: IndexSet<ClassName>,
    main_class: Option<ClassName>,
}

impl StaticArchive {
    pub fn from_spec(spec: &ArchiveSpec) -> Self {
        Self {
            id: spec.id.clone(),
            kind: spec.kind,
            scope: spec.scope.clone(),
            beans_xml: spec.beans_xml,
            mode: spec.discovery_mode,
            classes: spec
                .classes
                .iter()
                .map(|c| (c.name.clone(), c.clone()))
                .collect(),
            annotation_types: spec.annotation_types.iter().cloned().collect(),
            extra_classes: spec.extra_classes.iter().cloned().collect(),
            extension_classes: spec.extension_classes.iter().cloned().collect(),
            main_class: spec.main_class.clone(),
        }
    }

    pub fn builder(id: &str, scope: &str) -> StaticArchiveBuilder {
        StaticArchiveBuilder {
            spec: ArchiveSpec {
                id: ArchiveId::new(id),
                scope: ScopeId::new(scope),
                ..Default::default()
            },
        }
    }

    fn not_found(&self, name: &str) -> ApiError {
        ApiError::ClassNotFound {
            class: ClassName::new(name),
            archive: self.id.clone(),
        }
    }
}

impl Archive for StaticArchive {
    fn id(&self) -> &ArchiveId {
        &self.id
    }

    fn kind(&self) -> ArchiveKind {
        self.kind
    }

    fn scope(&self) -> &ScopeId {
        &self.scope
    }

    fn local_class_names(&self) -> IndexSet<ClassName> {
        self.classes.keys().cloned().collect()
    }

    fn discovery_mode(&self) -> Option<DiscoveryMode> {
        self.mode
    }

    fn beans_xml(&self) -> BeansXml {
        self.beans_xml
    }

    fn local_annotations(&self) -> IndexSet<AnnotationName> {
        self.annotation_types.clone()
    }

    fn classes_annotated_with(
        &self,
        annotations: &IndexSet<AnnotationName>,
    ) -> IndexSet<ClassName> {
        self.classes
            .values()
            .filter(|c| c.annotations.iter().any(|a| annotations.contains(a)))
            .map(|c| c.name.clone())
            .collect()
    }

    fn load_class(&self, name: &str) -> ApiResult<LoadedClass> {
        match self.classes.get(name) {
            Some(spec) if !spec.loadable => Err(self.not_found(name)),
            Some(spec) => Ok(LoadedClass::new(
                spec.name.clone(),
                spec.defined_in.clone().unwrap_or_else(|| self.scope.clone()),
            )),
            None if self.extra_classes.contains(name) || self.extension_classes.contains(name) => {
                Ok(LoadedClass::new(name, self.scope.clone()))
            }
            None => Err(self.not_found(name)),
        }
    }

    fn main_entry_class_name(&self) -> Option<ClassName> {
        self.main_class.clone()
    }

    fn extra_classes(&self) -> IndexSet<ClassName> {
        self.extra_classes.clone()
    }

    fn extension_classes(&self) -> IndexSet<ClassName> {
        self.extension_classes.clone()
    }
}

/// Fluent construction of a [`StaticArchive`], mostly for tests and
/// embedding.
#[derive(Debug, Clone)]
pub struct StaticArchiveBuilder {
    spec: ArchiveSpec,
}

impl StaticArchiveBuilder {
    pub fn kind(mut self, kind: ArchiveKind) -> Self {
        self.spec.kind = kind;
        self
    }

    pub fn beans_xml(mut self, beans_xml: BeansXml) -> Self {
        self.spec.beans_xml = beans_xml;
        self
    }

    pub fn mode(mut self, mode: DiscoveryMode) -> Self {
        self.spec.discovery_mode = Some(mode);
        self
    }

    pub fn class(mut self, name: &str, annotations: &[&str]) -> Self {
        let mut class = ClassSpec::new(name);
        class.annotations = annotations.iter().map(|a| AnnotationName::new(a)).collect();
        self.spec.classes.push(class);
        self
    }

    pub fn class_defined_in(mut self, name: &str, scope: ScopeId) -> Self {
        let mut class = ClassSpec::new(name);
        class.defined_in = Some(scope);
        self.spec.classes.push(class);
        self
    }

    pub fn unloadable_class(mut self, name: &str) -> Self {
        let mut class = ClassSpec::new(name);
        class.loadable = false;
        self.spec.classes.push(class);
        self
    }

    pub fn annotation_type(mut self, name: &str) -> Self {
        self.spec.annotation_types.push(AnnotationName::new(name));
        self
    }

    pub fn extra_class(mut self, name: &str) -> Self {
        self.spec.extra_classes.push(ClassName::new(name));
        self
    }

    pub fn extension_class(mut self, name: &str) -> Self {
        self.spec.extension_classes.push(ClassName::new(name));
        self
    }

    pub fn main_class(mut self, name: &str) -> Self {
        self.spec.main_class = Some(ClassName::new(name));
        self
    }

    pub fn build(self) -> StaticArchive {
        StaticArchive::from_spec(&self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"{
        "application": "shop",
        "config": { "empty_beans_xml_explicit": false },
        "scopes": [{ "id": "war", "parent": "app" }, { "id": "app" }],
        "archives": [
            { "id": "shop.war", "kind": "web_module", "scope": "war",
              "accessible": ["lib.jar"],
              "classes": [{ "name": "com.acme.Cart",
                            "annotations": ["jakarta.enterprise.context.SessionScoped"] }] },
            { "id": "lib.jar", "scope": "app", "beans_xml": { "state": "declared", "mode": "all" },
              "classes": [{ "name": "com.acme.Repo" }, { "name": "com.acme.Gone", "loadable": false }] }
        ]
    }"#;

    #[test]
    fn test_descriptor_builds_graph_with_forward_edges() {
        let descriptor = DeploymentDescriptor::from_json(DESCRIPTOR).unwrap();
        assert!(!descriptor.config.empty_beans_xml_explicit);

        let graph = descriptor
            .build_graph(Arc::new(ExtensionClassCache::new()))
            .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(
            graph.accessible_neighbors(&ArchiveId::new("shop.war")).unwrap(),
            vec![ArchiveId::new("lib.jar")]
        );
        assert!(
            graph
                .scopes()
                .is_ancestor_or_self(&ScopeId::new("app"), &ScopeId::new("war"))
        );
    }

    #[test]
    fn test_unknown_edge_target_is_rejected() {
        let json = r#"{ "application": "x", "archives": [
            { "id": "a.jar", "scope": "app", "accessible": ["missing.jar"] } ] }"#;
        let descriptor = DeploymentDescriptor::from_json(json).unwrap();
        let err = descriptor
            .build_graph(Arc::new(ExtensionClassCache::new()))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::UnknownArchive(_)));
    }

    #[test]
    fn test_unresolvable_scope_parent_is_rejected() {
        let json = r#"{ "application": "x",
            "scopes": [{ "id": "war", "parent": "nowhere" }], "archives": [] }"#;
        let descriptor = DeploymentDescriptor::from_json(json).unwrap();
        let err = descriptor
            .build_graph(Arc::new(ExtensionClassCache::new()))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::UnknownScope(_)));
    }

    #[test]
    fn test_static_archive_load_class() {
        let descriptor = DeploymentDescriptor::from_json(DESCRIPTOR).unwrap();
        let lib = StaticArchive::from_spec(&descriptor.archives[1]);
        assert_eq!(
            lib.load_class("com.acme.Repo").unwrap(),
            LoadedClass::new("com.acme.Repo", ScopeId::new("app"))
        );
        assert!(matches!(
            lib.load_class("com.acme.Gone"),
            Err(ApiError::ClassNotFound { .. })
        ));
        assert!(lib.load_class("com.acme.Nope").is_err());
    }

    #[test]
    fn test_schema_mentions_archives() {
        let schema = serde_json::to_string(&DeploymentDescriptor::schema()).unwrap();
        assert!(schema.contains("archives"));
        assert!(schema.contains("beans_xml"));
    }
}
