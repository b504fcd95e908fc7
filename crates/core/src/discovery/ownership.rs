use crate::model::ArchiveGraph;
use beanscope_api::{ClassName, LoadedClass};
use indexmap::{IndexMap, IndexSet};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::{debug, trace, warn};

impl ArchiveGraph {
    /// Loads each candidate and keeps the ones this archive owns.
    ///
    /// A class is kept when it was defined by the archive's own scope, or
    /// when no accessible neighbor already owns the identical loaded type.
    /// Classes that fail to load are logged and skipped.
    pub(crate) fn arbitrate_at(
        &self,
        idx: NodeIndex,
        names: IndexSet<ClassName>,
    ) -> IndexMap<ClassName, LoadedClass> {
        let archive = &self.graph[idx].archive;
        let scope = archive.scope();
        let mut owned = IndexMap::with_capacity(names.len());

        for name in names {
            let loaded = match archive.load_class(&name) {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!("Skipping candidate in {}: {}", archive.id(), e);
                    continue;
                }
            };

            if loaded.is_defined_by(scope) {
                owned.insert(name, loaded);
                continue;
            }

            match self.claiming_neighbor(idx, &loaded) {
                Some(owner) => {
                    trace!(
                        "{} defers {} to {}",
                        archive.id(),
                        loaded,
                        self.id_at(owner)
                    );
                }
                None => {
                    owned.insert(name, loaded);
                }
            }
        }

        owned
    }

    fn claiming_neighbor(&self, idx: NodeIndex, class: &LoadedClass) -> Option<NodeIndex> {
        self.neighbors_of(idx, Direction::Outgoing)
            .into_iter()
            .find(|&n| {
                let record = &self.graph[n].record;
                if record.is_visited() && !record.is_scanned() {
                    debug!(
                        "{} checks ownership of {} against cycle member {} before it is scanned",
                        self.id_at(idx),
                        class,
                        self.id_at(n)
                    );
                }
                record.owns(class)
            })
    }
}
