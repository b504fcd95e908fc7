use beanscope_api::{AnnotationName, ClassName, DiscoveryMode, LoadedClass};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;

/// Per-archive discovery state.
///
/// `visited` and `scanned` only ever go from `false` to `true`. The memoized
/// results are write-once cells: once a value is published it never changes,
/// so it can be read from other threads after the owning scan completes.
#[derive(Debug, Default)]
pub struct DiscoveryRecord {
    visited: bool,
    scanned: bool,
    pub(crate) mode: OnceCell<DiscoveryMode>,
    pub(crate) direct_annotations: OnceCell<IndexSet<AnnotationName>>,
    pub(crate) accessible_annotations: OnceCell<IndexSet<AnnotationName>>,
    pub(crate) candidate_classes: OnceCell<IndexMap<ClassName, LoadedClass>>,
}

impl DiscoveryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn is_scanned(&self) -> bool {
        self.scanned
    }

    /// Returns `true` if this call moved the record to visited.
    pub(crate) fn mark_visited(&mut self) -> bool {
        !std::mem::replace(&mut self.visited, true)
    }

    pub(crate) fn mark_scanned(&mut self) {
        debug_assert!(self.visited, "scanned before visited");
        self.scanned = true;
    }

    pub fn mode(&self) -> Option<DiscoveryMode> {
        self.mode.get().copied()
    }

    pub fn direct_annotations(&self) -> Option<&IndexSet<AnnotationName>> {
        self.direct_annotations.get()
    }

    pub fn accessible_annotations(&self) -> Option<&IndexSet<AnnotationName>> {
        self.accessible_annotations.get()
    }

    pub fn candidate_classes(&self) -> Option<&IndexMap<ClassName, LoadedClass>> {
        self.candidate_classes.get()
    }

    /// Whether this record already owns exactly `class` (same name, same
    /// defining scope).
    pub fn owns(&self, class: &LoadedClass) -> bool {
        self.candidate_classes
            .get()
            .and_then(|owned| owned.get(&class.name))
            .is_some_and(|existing| existing == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beanscope_api::ScopeId;

    #[test]
    fn test_flags_are_monotonic() {
        let mut record = DiscoveryRecord::new();
        assert!(record.mark_visited());
        assert!(!record.mark_visited());
        record.mark_scanned();
        assert!(record.is_visited());
        assert!(record.is_scanned());
    }

    #[test]
    fn test_owns_requires_identical_type() {
        let record = DiscoveryRecord::new();
        let app = LoadedClass::new("com.acme.Shared", ScopeId::new("app"));
        let war = LoadedClass::new("com.acme.Shared", ScopeId::new("war"));
        assert!(!record.owns(&app));

        let mut owned = IndexMap::new();
        owned.insert(app.name.clone(), app.clone());
        record.candidate_classes.set(owned).unwrap();

        assert!(record.owns(&app));
        assert!(!record.owns(&war));
    }
}
