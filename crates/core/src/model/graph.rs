use crate::cache::ExtensionClassCache;
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::model::record::DiscoveryRecord;
use crate::model::scope::ScopeHierarchy;
use beanscope_api::{
    AnnotationName, ArchiveId, ArchiveKind, ArchiveRef, ArchiveReport, ClassName,
    DiscoveryReport, LoadedClass, ScopeId,
};
use indexmap::{IndexMap, IndexSet};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// An archive and its discovery state, stored as one arena slot.
pub struct ArchiveNode {
    pub archive: ArchiveRef,
    pub record: DiscoveryRecord,
}

impl std::fmt::Debug for ArchiveNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveNode")
            .field("id", self.archive.id())
            .field("kind", &self.archive.kind())
            .field("record", &self.record)
            .finish()
    }
}

/// Arena of archives connected by "accessible" edges.
///
/// An edge `a -> b` means classes in `b` are visible to `a`. Incoming edges
/// are the descendant relation and are only used to aggregate results.
/// Nodes and edges are never removed; the whole graph is dropped at teardown.
pub struct ArchiveGraph {
    pub(crate) graph: DiGraph<ArchiveNode, ()>,
    pub(crate) ids: HashMap<ArchiveId, NodeIndex>,
    pub(crate) scopes: ScopeHierarchy,
    pub(crate) config: Arc<DiscoveryConfig>,
    pub(crate) cache: Arc<ExtensionClassCache>,
    pub(crate) scan_order: Vec<NodeIndex>,
}

impl ArchiveGraph {
    pub fn new(config: Arc<DiscoveryConfig>, cache: Arc<ExtensionClassCache>) -> Self {
        Self {
            graph: DiGraph::new(),
            ids: HashMap::new(),
            scopes: ScopeHierarchy::new(),
            config,
            cache,
            scan_order: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(DiscoveryConfig::default()),
            Arc::new(ExtensionClassCache::new()),
        )
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn scopes(&self) -> &ScopeHierarchy {
        &self.scopes
    }

    pub fn register_scope(&mut self, scope: ScopeId, parent: Option<ScopeId>) -> Result<()> {
        self.scopes.register(scope, parent)
    }

    /// Adds an archive and its accessible edges. Every edge target must
    /// already be registered.
    pub fn register_archive(&mut self, archive: ArchiveRef, edges: &[ArchiveId]) -> Result<()> {
        let id = archive.id().clone();
        if self.ids.contains_key(&id) {
            return Err(DiscoveryError::DuplicateArchive(id));
        }
        for target in edges {
            if target == &id {
                return Err(DiscoveryError::SelfReference(id));
            }
            if !self.ids.contains_key(target) {
                return Err(DiscoveryError::UnknownArchive(target.clone()));
            }
        }

        debug!("Registering archive {} ({})", id, archive.kind());
        let idx = self.graph.add_node(ArchiveNode {
            archive,
            record: DiscoveryRecord::new(),
        });
        self.ids.insert(id, idx);

        for target in edges {
            let to = self.ids[target];
            self.graph.update_edge(idx, to, ());
        }
        Ok(())
    }

    /// Makes `to` accessible from `from`. Adding an existing edge is a no-op.
    pub fn add_edge(&mut self, from: &ArchiveId, to: &ArchiveId) -> Result<()> {
        if from == to {
            return Err(DiscoveryError::SelfReference(from.clone()));
        }
        let a = self.node_index(from)?;
        let b = self.node_index(to)?;
        self.graph.update_edge(a, b, ());
        Ok(())
    }

    pub fn contains(&self, id: &ArchiveId) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Archive ids in registration order.
    pub fn archive_ids(&self) -> Vec<ArchiveId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].archive.id().clone())
            .collect()
    }

    pub fn archive(&self, id: &ArchiveId) -> Result<&ArchiveRef> {
        let idx = self.node_index(id)?;
        Ok(&self.graph[idx].archive)
    }

    pub fn record(&self, id: &ArchiveId) -> Result<&DiscoveryRecord> {
        let idx = self.node_index(id)?;
        Ok(&self.graph[idx].record)
    }

    pub fn is_visited(&self, id: &ArchiveId) -> Result<bool> {
        Ok(self.record(id)?.is_visited())
    }

    pub fn is_scanned(&self, id: &ArchiveId) -> Result<bool> {
        Ok(self.record(id)?.is_scanned())
    }

    pub fn accessible_neighbors(&self, id: &ArchiveId) -> Result<Vec<ArchiveId>> {
        let idx = self.node_index(id)?;
        Ok(self.ids_of(self.neighbors_of(idx, Direction::Outgoing)))
    }

    /// Archives that can see `id`.
    pub fn descendants(&self, id: &ArchiveId) -> Result<Vec<ArchiveId>> {
        let idx = self.node_index(id)?;
        Ok(self.ids_of(self.neighbors_of(idx, Direction::Incoming)))
    }

    /// Owned candidate classes. Only valid once the archive is scanned.
    pub fn candidate_classes(&self, id: &ArchiveId) -> Result<IndexSet<ClassName>> {
        Ok(self.owned_classes(id)?.keys().cloned().collect())
    }

    /// Owned candidate classes with their loaded handles.
    pub fn owned_classes(&self, id: &ArchiveId) -> Result<&IndexMap<ClassName, LoadedClass>> {
        let record = self.record(id)?;
        if !record.is_scanned() {
            return Err(DiscoveryError::NotScanned(id.clone()));
        }
        record
            .candidate_classes()
            .ok_or_else(|| DiscoveryError::NotScanned(id.clone()))
    }

    /// Direct annotations of `id`, computed on first request regardless of
    /// scan state.
    pub fn direct_annotations(&self, id: &ArchiveId) -> Result<IndexSet<AnnotationName>> {
        let idx = self.node_index(id)?;
        Ok(self.direct_annotations_at(idx).clone())
    }

    /// Archives in the order they completed both discovery phases.
    pub fn scan_order(&self) -> Vec<ArchiveId> {
        self.ids_of(self.scan_order.iter().copied())
    }

    /// Class name to owning archive, across the whole graph.
    pub fn owner_of(&self, class: &str) -> Option<ArchiveId> {
        self.graph.node_indices().find_map(|idx| {
            let node = &self.graph[idx];
            node.record
                .candidate_classes()
                .filter(|owned| owned.contains_key(class))
                .map(|_| node.archive.id().clone())
        })
    }

    pub fn report(&self) -> DiscoveryReport {
        let archives = self
            .graph
            .node_indices()
            .map(|idx| {
                let node = &self.graph[idx];
                let record = &node.record;
                ArchiveReport {
                    id: node.archive.id().clone(),
                    kind: node.archive.kind(),
                    mode: record.mode(),
                    visited: record.is_visited(),
                    scanned: record.is_scanned(),
                    direct_annotations: record
                        .direct_annotations()
                        .map(|a| a.iter().cloned().collect())
                        .unwrap_or_default(),
                    candidate_classes: record
                        .candidate_classes()
                        .map(|c| c.keys().cloned().collect())
                        .unwrap_or_default(),
                    accessible: self.ids_of(self.neighbors_of(idx, Direction::Outgoing)),
                    descendants: self.ids_of(self.neighbors_of(idx, Direction::Incoming)),
                }
            })
            .collect();

        DiscoveryReport {
            archives,
            scan_order: self.scan_order(),
        }
    }

    pub(crate) fn node_index(&self, id: &ArchiveId) -> Result<NodeIndex> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| DiscoveryError::UnknownArchive(id.clone()))
    }

    /// Neighbors in edge-insertion order.
    ///
    /// petgraph walks adjacency lists newest-first, so sort by edge index to
    /// keep traversal order tied to registration order.
    pub(crate) fn neighbors_of(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge, _)| edge.index());
        edges.into_iter().map(|(_, n)| n).collect()
    }

    /// Scheduler children: accessible neighbors minus runtime extensions,
    /// which have no traversal-significant children.
    pub(crate) fn traversal_children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_of(idx, Direction::Outgoing)
            .into_iter()
            .filter(|&n| self.graph[n].archive.kind() != ArchiveKind::RuntimeExtension)
            .collect()
    }

    /// The runtime extensions left out of [`Self::traversal_children`].
    pub(crate) fn extension_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_of(idx, Direction::Outgoing)
            .into_iter()
            .filter(|&n| self.graph[n].archive.kind() == ArchiveKind::RuntimeExtension)
            .collect()
    }

    pub(crate) fn id_at(&self, idx: NodeIndex) -> &ArchiveId {
        self.graph[idx].archive.id()
    }

    fn ids_of(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<ArchiveId> {
        indices
            .into_iter()
            .map(|idx| self.id_at(idx).clone())
            .collect()
    }
}

impl std::fmt::Debug for ArchiveGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveGraph")
            .field("archives", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("scanned", &self.scan_order.len())
            .finish()
    }
}
