use crate::error::ApiResult;
use crate::models::{
    AnnotationName, ArchiveId, ArchiveKind, BeansXml, ClassName, DiscoveryMode, LoadedClass,
    ScopeId,
};
use indexmap::IndexSet;
use std::sync::Arc;

/// A deployable unit of code taking part in component discovery.
///
/// Implementations are supplied by the host runtime. Accessible edges are not
/// part of this trait: the discovery graph owns them.
pub trait Archive: Send + Sync {
    fn id(&self) -> &ArchiveId;

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::SharedLibrary
    }

    /// Class-loading scope that defines this archive's own classes.
    fn scope(&self) -> &ScopeId;

    fn local_class_names(&self) -> IndexSet<ClassName>;

    /// Explicit discovery mode. `None` lets the engine derive it from
    /// [`Archive::beans_xml`].
    fn discovery_mode(&self) -> Option<DiscoveryMode> {
        None
    }

    fn beans_xml(&self) -> BeansXml {
        BeansXml::Absent
    }

    /// Marker annotation types declared by this archive (custom scopes,
    /// stereotypes).
    fn local_annotations(&self) -> IndexSet<AnnotationName>;

    /// Every class in this archive's universe carrying at least one of
    /// `annotations`.
    fn classes_annotated_with(&self, annotations: &IndexSet<AnnotationName>)
    -> IndexSet<ClassName>;

    fn load_class(&self, name: &str) -> ApiResult<LoadedClass>;

    fn main_entry_class_name(&self) -> Option<ClassName> {
        None
    }

    /// Classes injected out-of-band by the caller.
    fn extra_classes(&self) -> IndexSet<ClassName> {
        IndexSet::new()
    }

    /// Portable extension classes declared in the archive's service metadata.
    fn extension_classes(&self) -> IndexSet<ClassName> {
        IndexSet::new()
    }
}

pub type ArchiveRef = Arc<dyn Archive>;
