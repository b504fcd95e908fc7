use super::mode::resolve_mode;
use crate::error::Result;
use crate::model::ArchiveGraph;
use beanscope_api::{AnnotationName, ArchiveId, DiscoveryMode};
use indexmap::IndexSet;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::trace;

impl ArchiveGraph {
    /// Marker annotations applicable to `id`.
    ///
    /// With `include_accessible` the direct annotations of every accessible
    /// neighbor are unioned in. Neighbors contribute only their own direct
    /// set, so propagation is exactly one hop and cycles need no guard.
    /// Does not touch the visited/scanned flags.
    pub fn annotations(
        &self,
        id: &ArchiveId,
        include_accessible: bool,
    ) -> Result<IndexSet<AnnotationName>> {
        let idx = self.node_index(id)?;
        Ok(self.annotations_at(idx, include_accessible).clone())
    }

    pub(crate) fn annotations_at(
        &self,
        idx: NodeIndex,
        include_accessible: bool,
    ) -> &IndexSet<AnnotationName> {
        if !include_accessible {
            return self.direct_annotations_at(idx);
        }
        self.graph[idx].record.accessible_annotations.get_or_init(|| {
            let mut all = self.direct_annotations_at(idx).clone();
            for neighbor in self.neighbors_of(idx, Direction::Outgoing) {
                all.extend(self.direct_annotations_at(neighbor).iter().cloned());
            }
            trace!(
                "{} sees {} annotations through accessible archives",
                self.id_at(idx),
                all.len()
            );
            all
        })
    }

    pub(crate) fn direct_annotations_at(&self, idx: NodeIndex) -> &IndexSet<AnnotationName> {
        let node = &self.graph[idx];
        node.record.direct_annotations.get_or_init(|| {
            if self.mode_at(idx) == DiscoveryMode::None {
                return IndexSet::new();
            }
            let local = node.archive.local_class_names();
            let mut direct: IndexSet<AnnotationName> = node
                .archive
                .local_annotations()
                .into_iter()
                .filter(|a| local.contains(a))
                .collect();
            direct.extend(self.config.baseline_annotations.iter().cloned());
            direct
        })
    }

    pub(crate) fn mode_at(&self, idx: NodeIndex) -> DiscoveryMode {
        let node = &self.graph[idx];
        *node
            .record
            .mode
            .get_or_init(|| resolve_mode(node.archive.as_ref(), &self.config))
    }
}

#[cfg(test)]
mod tests {
    use crate::descriptor::StaticArchive;
    use crate::model::ArchiveGraph;
    use beanscope_api::{ArchiveId, DiscoveryMode};
    use std::sync::Arc;

    const SCOPED: &str = "jakarta.enterprise.context.ApplicationScoped";

    #[test]
    fn test_direct_annotations_keep_only_local_markers() {
        let mut graph = ArchiveGraph::with_defaults();
        let archive = StaticArchive::builder("lib.jar", "app")
            .mode(DiscoveryMode::Annotated)
            .annotation_type("com.acme.Audited")
            .annotation_type("com.other.Remote")
            .class("com.acme.Audited", &[])
            .build();
        graph.register_archive(Arc::new(archive), &[]).unwrap();

        let direct = graph.direct_annotations(&ArchiveId::new("lib.jar")).unwrap();
        assert!(direct.contains("com.acme.Audited"));
        assert!(!direct.contains("com.other.Remote"));
        assert!(direct.contains(SCOPED));
    }

    #[test]
    fn test_none_mode_has_no_annotations() {
        let mut graph = ArchiveGraph::with_defaults();
        let archive = StaticArchive::builder("lib.jar", "app")
            .mode(DiscoveryMode::None)
            .annotation_type("com.acme.Audited")
            .class("com.acme.Audited", &[])
            .build();
        graph.register_archive(Arc::new(archive), &[]).unwrap();

        assert!(
            graph
                .direct_annotations(&ArchiveId::new("lib.jar"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_accessible_union_is_one_hop() {
        let mut graph = ArchiveGraph::with_defaults();
        let c = StaticArchive::builder("c.jar", "app")
            .mode(DiscoveryMode::Annotated)
            .annotation_type("com.c.Deep")
            .class("com.c.Deep", &[])
            .build();
        let b = StaticArchive::builder("b.jar", "app")
            .mode(DiscoveryMode::Annotated)
            .annotation_type("com.b.Near")
            .class("com.b.Near", &[])
            .build();
        let a = StaticArchive::builder("a.war", "app")
            .mode(DiscoveryMode::Annotated)
            .build();
        graph.register_archive(Arc::new(c), &[]).unwrap();
        graph
            .register_archive(Arc::new(b), &[ArchiveId::new("c.jar")])
            .unwrap();
        graph
            .register_archive(Arc::new(a), &[ArchiveId::new("b.jar")])
            .unwrap();

        let a_id = ArchiveId::new("a.war");
        let seen = graph.annotations(&a_id, true).unwrap();
        assert!(seen.contains("com.b.Near"));
        assert!(!seen.contains("com.c.Deep"));

        let direct = graph.annotations(&a_id, false).unwrap();
        assert!(!direct.contains("com.b.Near"));
        assert!(!graph.is_visited(&a_id).unwrap());
    }
}
