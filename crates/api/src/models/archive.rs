use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Fully-qualified name of a class, e.g. `com.example.OrderService`.
pub type ClassName = SmolStr;

/// Fully-qualified name of an annotation type.
pub type AnnotationName = SmolStr;

/// Stable identifier of an archive within one deployment graph.
#[derive(
    Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(transparent)]
pub struct ArchiveId(#[schemars(with = "String")] pub SmolStr);

impl ArchiveId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArchiveId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArchiveId {
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

/// Identifier of a class-loading scope. Two classes with the same name are
/// the same type only when they were defined in the same scope.
#[derive(
    Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(transparent)]
pub struct ScopeId(#[schemars(with = "String")] pub SmolStr);

impl ScopeId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Packaging role of an archive inside a deployment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    WebModule,
    EjbModule,
    /// Application client launcher; its main class is never a managed component.
    ClientModule,
    ResourceAdapter,
    #[default]
    SharedLibrary,
    WebInfLib,
    ManifestClassPath,
    /// Server-provided archive shared by every application. Never traversed
    /// as a scheduler child.
    RuntimeExtension,
    /// Singleton archive synthesized for a class outside every known archive.
    OnDemand,
}

impl ArchiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveKind::WebModule => "web_module",
            ArchiveKind::EjbModule => "ejb_module",
            ArchiveKind::ClientModule => "client_module",
            ArchiveKind::ResourceAdapter => "resource_adapter",
            ArchiveKind::SharedLibrary => "shared_library",
            ArchiveKind::WebInfLib => "web_inf_lib",
            ArchiveKind::ManifestClassPath => "manifest_class_path",
            ArchiveKind::RuntimeExtension => "runtime_extension",
            ArchiveKind::OnDemand => "on_demand",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy controlling which local classes an archive contributes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Contributes no automatically-discovered classes.
    None,
    /// Only classes carrying an applicable marker annotation.
    Annotated,
    /// Every local class.
    All,
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiscoveryMode::None => "none",
            DiscoveryMode::Annotated => "annotated",
            DiscoveryMode::All => "all",
        };
        f.write_str(s)
    }
}

/// What the archive's beans.xml descriptor says, if it has one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "lowercase", tag = "state", content = "mode")]
pub enum BeansXml {
    #[default]
    Absent,
    /// Present but with no `bean-discovery-mode` attribute.
    Empty,
    Declared(DiscoveryMode),
}
