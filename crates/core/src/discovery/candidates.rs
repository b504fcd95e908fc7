use crate::model::ArchiveGraph;
use beanscope_api::{ArchiveKind, ClassName, DiscoveryMode};
use indexmap::IndexSet;
use petgraph::graph::NodeIndex;
use tracing::trace;

impl ArchiveGraph {
    /// Raw candidate class names local to the archive at `idx`, before
    /// ownership arbitration.
    ///
    /// Runtime extensions are resolved once per process through the shared
    /// extension cache.
    pub(crate) fn candidate_names_at(&self, idx: NodeIndex) -> IndexSet<ClassName> {
        let archive = &self.graph[idx].archive;
        if archive.kind() == ArchiveKind::RuntimeExtension && self.config.cache_runtime_extensions
        {
            let cached = self
                .cache
                .get_or_compute(archive.id(), || self.compute_candidate_names(idx));
            return cached.as_ref().clone();
        }
        self.compute_candidate_names(idx)
    }

    fn compute_candidate_names(&self, idx: NodeIndex) -> IndexSet<ClassName> {
        let archive = &self.graph[idx].archive;
        let mode = self.mode_at(idx);

        let mut candidates = match mode {
            DiscoveryMode::Annotated => {
                let annotations =
                    self.annotations_at(idx, self.config.include_accessible_annotations);
                let local = archive.local_class_names();
                // Classes found through neighbors belong to the neighbor that
                // actually contains them.
                archive
                    .classes_annotated_with(annotations)
                    .into_iter()
                    .filter(|c| local.contains(c))
                    .collect()
            }
            DiscoveryMode::All => archive.local_class_names(),
            DiscoveryMode::None => IndexSet::new(),
        };

        if mode != DiscoveryMode::All {
            let extensions = archive.extension_classes();
            if !extensions.is_empty() {
                trace!(
                    "{} contributes {} extension classes",
                    archive.id(),
                    extensions.len()
                );
                candidates.extend(extensions);
            }
        }

        candidates.extend(archive.extra_classes());

        if archive.kind() == ArchiveKind::ClientModule {
            if let Some(main) = archive.main_entry_class_name() {
                candidates.shift_remove(&main);
            }
        }

        candidates
    }
}
