//! On-demand graph growth for classes outside every known archive.

use crate::error::Result;
use crate::model::ArchiveGraph;
use beanscope_api::{
    AnnotationName, ApiError, ApiResult, Archive, ArchiveId, ArchiveKind, ClassName,
    DiscoveryMode, LoadedClass, ScopeId,
};
use indexmap::IndexSet;
use petgraph::graph::NodeIndex;
use std::sync::Arc;
use tracing::{debug, info};

/// Singleton archive wrapping one class that no registered archive contains.
#[derive(Debug, Clone)]
pub struct OnDemandArchive {
    id: ArchiveId,
    class: ClassName,
    scope: ScopeId,
}

impl OnDemandArchive {
    pub fn new(class: impl Into<ClassName>, scope: ScopeId) -> Self {
        let class = class.into();
        Self {
            id: ArchiveId::new(format!("on-demand:{class}")),
            class,
            scope,
        }
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }
}

impl Archive for OnDemandArchive {
    fn id(&self) -> &ArchiveId {
        &self.id
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::OnDemand
    }

    fn scope(&self) -> &ScopeId {
        &self.scope
    }

    fn local_class_names(&self) -> IndexSet<ClassName> {
        IndexSet::new()
    }

    fn discovery_mode(&self) -> Option<DiscoveryMode> {
        Some(DiscoveryMode::None)
    }

    fn local_annotations(&self) -> IndexSet<AnnotationName> {
        IndexSet::new()
    }

    fn classes_annotated_with(&self, _: &IndexSet<AnnotationName>) -> IndexSet<ClassName> {
        IndexSet::new()
    }

    fn load_class(&self, name: &str) -> ApiResult<LoadedClass> {
        if name == self.class.as_str() {
            Ok(LoadedClass::new(self.class.clone(), self.scope.clone()))
        } else {
            Err(ApiError::ClassNotFound {
                class: ClassName::new(name),
                archive: self.id.clone(),
            })
        }
    }

    fn extra_classes(&self) -> IndexSet<ClassName> {
        IndexSet::from([self.class.clone()])
    }
}

impl ArchiveGraph {
    /// Archive containing `class`, synthesizing and wiring a singleton archive
    /// if no registered archive lists it locally or as an additional class.
    ///
    /// Wiring compares `scope` with every existing archive's scope: an
    /// archive whose scope descends from `scope` can see the new archive, and
    /// the new archive can see every archive whose scope is one of its own
    /// ancestors. Existing records are not reopened.
    pub fn archive_for_class(&mut self, class: &str, scope: &ScopeId) -> Result<ArchiveId> {
        if let Some(idx) = self.find_containing(class) {
            return Ok(self.id_at(idx).clone());
        }

        let archive = OnDemandArchive::new(class, scope.clone());
        let id = archive.id().clone();
        if self.contains(&id) {
            return Ok(id);
        }

        let existing: Vec<NodeIndex> = self.graph.node_indices().collect();
        let mut sees_existing = Vec::new();
        let mut seen_by = Vec::new();
        for idx in existing {
            let other = &self.graph[idx].archive;
            if other.kind() == ArchiveKind::RuntimeExtension {
                sees_existing.push(idx);
                continue;
            }
            let other_scope = other.scope();
            if self.scopes.is_ancestor_or_self(scope, other_scope) {
                seen_by.push(idx);
            }
            if self.scopes.is_ancestor_or_self(other_scope, scope) {
                sees_existing.push(idx);
            }
        }

        self.register_archive(Arc::new(archive), &[])?;
        let new_idx = self.node_index(&id)?;
        for idx in &sees_existing {
            self.graph.update_edge(new_idx, *idx, ());
        }
        for idx in &seen_by {
            self.graph.update_edge(*idx, new_idx, ());
        }

        info!(
            "Created on-demand archive {} in scope {} ({} outgoing, {} incoming edges)",
            id,
            scope,
            sees_existing.len(),
            seen_by.len()
        );
        Ok(id)
    }

    /// [`ArchiveGraph::archive_for_class`] followed by a scan of the result.
    pub fn load_archive_for_class(&mut self, class: &str, scope: &ScopeId) -> Result<ArchiveId> {
        let id = self.archive_for_class(class, scope)?;
        self.scan(&id)?;
        Ok(id)
    }

    fn find_containing(&self, class: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&idx| {
            let archive = &self.graph[idx].archive;
            let found = archive.local_class_names().contains(class)
                || archive.extra_classes().contains(class);
            if found {
                debug!("{} already contains {}", archive.id(), class);
            }
            found
        })
    }
}
