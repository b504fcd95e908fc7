//! Dependency-ordered scan of the archive graph.
//!
//! The traversal is an iterative depth-first walk over an explicit stack of
//! `(archive, remaining children)` frames. An archive is scanned when its
//! frame has no unvisited children left, so everything reachable from it has
//! been scanned first. Members of a cycle are an exception: the member whose
//! frame drains first is scanned while its cycle-mates are still on the
//! stack, so it cannot see their ownership decisions. Which member goes first
//! depends on registration order.
//!
//! Runtime extensions have no traversal-significant children and are never
//! pushed as frames. They are discovered in place, just before the first
//! archive that can see them.

use crate::error::Result;
use crate::model::ArchiveGraph;
use beanscope_api::ArchiveId;
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

struct Frame {
    archive: NodeIndex,
    children: std::vec::IntoIter<NodeIndex>,
}

impl ArchiveGraph {
    /// Scans every archive reachable from `root`. A no-op if `root` has
    /// already been visited.
    pub fn scan(&mut self, root: &ArchiveId) -> Result<()> {
        let idx = self.node_index(root)?;
        self.scan_from(idx);
        Ok(())
    }

    /// Scans every registered archive, starting new roots in registration
    /// order.
    pub fn scan_all(&mut self) {
        let roots: Vec<NodeIndex> = self.graph.node_indices().collect();
        let before = self.scan_order.len();
        for root in roots {
            if !self.graph[root].record.is_visited() {
                self.scan_from(root);
            }
        }
        info!(
            "Scanned {} archives ({} total)",
            self.scan_order.len() - before,
            self.scan_order.len()
        );
    }

    /// Scans the given archives as roots, in order.
    pub fn scan_archives(&mut self, roots: &[ArchiveId]) -> Result<()> {
        let indices = roots
            .iter()
            .map(|id| self.node_index(id))
            .collect::<Result<Vec<_>>>()?;
        for idx in indices {
            self.scan_from(idx);
        }
        Ok(())
    }

    fn scan_from(&mut self, root: NodeIndex) {
        if !self.graph[root].record.mark_visited() {
            return;
        }

        let mut stack = vec![self.frame(root)];

        while let Some(top) = stack.last_mut() {
            let current = top.archive;
            let mut next = None;
            for child in top.children.by_ref() {
                let record = &self.graph[child].record;
                if !record.is_visited() {
                    next = Some(child);
                    break;
                }
                if !record.is_scanned() {
                    debug!(
                        "Cycle: {} depends on {} which is still awaiting its dependencies",
                        self.id_at(current),
                        self.id_at(child)
                    );
                }
            }

            match next {
                Some(child) => {
                    self.graph[child].record.mark_visited();
                    stack.push(self.frame(child));
                }
                None => {
                    if !self.graph[current].record.is_scanned() {
                        self.discover_extensions_of(current);
                        self.discover(current);
                    }
                    stack.pop();
                }
            }
        }
    }

    /// Runtime extensions never get a frame of their own, so the extensions
    /// an archive sees are discovered right before the archive itself.
    fn discover_extensions_of(&mut self, idx: NodeIndex) {
        for ext in self.extension_neighbors(idx) {
            if self.graph[ext].record.mark_visited() {
                self.discover(ext);
            }
        }
    }

    fn frame(&self, archive: NodeIndex) -> Frame {
        Frame {
            archive,
            children: self.traversal_children(archive).into_iter(),
        }
    }

    /// Runs phase 1 and phase 2 for one archive and marks it scanned.
    fn discover(&mut self, idx: NodeIndex) {
        let annotations = self
            .annotations_at(idx, self.config.include_accessible_annotations)
            .len();
        let names = self.candidate_names_at(idx);
        let owned = self.arbitrate_at(idx, names);

        debug!(
            "Scanned {} [{}]: {} annotations, {} candidate classes",
            self.id_at(idx),
            self.mode_at(idx),
            annotations,
            owned.len()
        );

        let node = &mut self.graph[idx];
        if node.record.candidate_classes.set(owned).is_err() {
            debug!("Candidate classes for {} were already resolved", node.archive.id());
        }
        node.record.mark_scanned();
        self.scan_order.push(idx);
    }
}
