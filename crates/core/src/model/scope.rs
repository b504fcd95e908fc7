use crate::error::{DiscoveryError, Result};
use beanscope_api::ScopeId;
use std::collections::{HashMap, HashSet};

/// Parent links between class-loading scopes.
///
/// A scope sees its own classes and those of every ancestor. Scopes never
/// registered are treated as roots.
#[derive(Debug, Default, Clone)]
pub struct ScopeHierarchy {
    parents: HashMap<ScopeId, Option<ScopeId>>,
}

impl ScopeHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, scope: ScopeId, parent: Option<ScopeId>) -> Result<()> {
        if let Some(p) = &parent {
            if !self.parents.contains_key(p) {
                return Err(DiscoveryError::UnknownScope(p.clone()));
            }
        }
        self.parents.insert(scope, parent);
        Ok(())
    }

    pub fn contains(&self, scope: &ScopeId) -> bool {
        self.parents.contains_key(scope)
    }

    pub fn parent(&self, scope: &ScopeId) -> Option<&ScopeId> {
        self.parents.get(scope).and_then(|p| p.as_ref())
    }

    /// Walks `scope`'s parent chain looking for `ancestor`.
    pub fn is_ancestor_or_self(&self, ancestor: &ScopeId, scope: &ScopeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(scope);
        while let Some(s) = current {
            if s == ancestor {
                return true;
            }
            if !seen.insert(s) {
                return false;
            }
            current = self.parent(s);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> ScopeHierarchy {
        let mut h = ScopeHierarchy::new();
        h.register(ScopeId::new("server"), None).unwrap();
        h.register(ScopeId::new("app"), Some(ScopeId::new("server"))).unwrap();
        h.register(ScopeId::new("war"), Some(ScopeId::new("app"))).unwrap();
        h
    }

    #[test]
    fn test_ancestry_walks_parent_chain() {
        let h = hierarchy();
        assert!(h.is_ancestor_or_self(&ScopeId::new("server"), &ScopeId::new("war")));
        assert!(h.is_ancestor_or_self(&ScopeId::new("war"), &ScopeId::new("war")));
        assert!(!h.is_ancestor_or_self(&ScopeId::new("war"), &ScopeId::new("app")));
    }

    #[test]
    fn test_unregistered_scope_is_root() {
        let h = hierarchy();
        let loose = ScopeId::new("loose");
        assert!(h.is_ancestor_or_self(&loose, &loose));
        assert!(!h.is_ancestor_or_self(&ScopeId::new("server"), &loose));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut h = ScopeHierarchy::new();
        let err = h
            .register(ScopeId::new("war"), Some(ScopeId::new("missing")))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::UnknownScope(_)));
    }
}
