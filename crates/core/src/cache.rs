//! Process-wide cache of runtime-extension candidate classes.
//!
//! Runtime extensions are shared by every application on the server, so
//! their raw candidate set is computed once and reused by every deployment
//! graph. Ownership arbitration still runs per graph.

use beanscope_api::{ArchiveId, ClassName};
use dashmap::DashMap;
use indexmap::IndexSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtensionCacheStats {
    pub entries: usize,
    pub total_classes: usize,
}

#[derive(Debug, Default)]
pub struct ExtensionClassCache {
    entries: DashMap<ArchiveId, Arc<IndexSet<ClassName>>>,
}

impl ExtensionClassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached set for `key`, computing it with `compute` on a
    /// miss. `compute` runs without holding a shard lock; if two callers
    /// race, the first stored value wins.
    pub fn get_or_compute<F>(&self, key: &ArchiveId, compute: F) -> Arc<IndexSet<ClassName>>
    where
        F: FnOnce() -> IndexSet<ClassName>,
    {
        if let Some(hit) = self.entries.get(key) {
            return Arc::clone(hit.value());
        }
        let computed = Arc::new(compute());
        debug!("Cached {} classes for runtime extension {}", computed.len(), key);
        Arc::clone(self.entries.entry(key.clone()).or_insert(computed).value())
    }

    pub fn get(&self, key: &ArchiveId) -> Option<Arc<IndexSet<ClassName>>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, key: &ArchiveId) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> ExtensionCacheStats {
        ExtensionCacheStats {
            entries: self.entries.len(),
            total_classes: self.entries.iter().map(|e| e.value().len()).sum(),
        }
    }

    /// Drops every entry, e.g. when the server restarts its runtime.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn classes(names: &[&str]) -> IndexSet<ClassName> {
        names.iter().map(|n| ClassName::new(n)).collect()
    }

    #[test]
    fn test_computes_once_per_key() {
        let cache = ExtensionClassCache::new();
        let calls = Cell::new(0);
        let key = ArchiveId::new("ext.jar");

        let first = cache.get_or_compute(&key, || {
            calls.set(calls.get() + 1);
            classes(&["ext.A", "ext.B"])
        });
        let second = cache.get_or_compute(&key, || {
            calls.set(calls.get() + 1);
            classes(&["ext.C"])
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(
            cache.stats(),
            ExtensionCacheStats {
                entries: 1,
                total_classes: 2
            }
        );
    }

    #[test]
    fn test_clear_forgets_entries() {
        let cache = ExtensionClassCache::new();
        let key = ArchiveId::new("ext.jar");
        cache.get_or_compute(&key, || classes(&["ext.A"]));
        assert!(cache.contains(&key));

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(&key).is_none());
    }
}
