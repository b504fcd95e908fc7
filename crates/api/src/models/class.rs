use super::archive::{ClassName, ScopeId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a loaded class.
///
/// Identity is the pair (name, defining scope): the same name defined by two
/// different scopes is two different types.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct LoadedClass {
    #[schemars(with = "String")]
    pub name: ClassName,
    pub defining_scope: ScopeId,
}

impl LoadedClass {
    pub fn new(name: impl Into<ClassName>, defining_scope: ScopeId) -> Self {
        Self {
            name: name.into(),
            defining_scope,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_defined_by(&self, scope: &ScopeId) -> bool {
        &self.defining_scope == scope
    }
}

impl fmt::Display for LoadedClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.defining_scope)
    }
}
