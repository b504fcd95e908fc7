use crate::config::DiscoveryConfig;
use beanscope_api::{Archive, ArchiveKind, BeansXml, DiscoveryMode};

/// Discovery mode for `archive`: its explicit override if any, otherwise
/// derived from its beans.xml.
pub fn resolve_mode(archive: &dyn Archive, config: &DiscoveryConfig) -> DiscoveryMode {
    if let Some(mode) = archive.discovery_mode() {
        return mode;
    }
    match archive.beans_xml() {
        BeansXml::Declared(mode) => mode,
        BeansXml::Empty if config.empty_beans_xml_explicit => DiscoveryMode::All,
        BeansXml::Empty => DiscoveryMode::Annotated,
        BeansXml::Absent if archive.kind() == ArchiveKind::RuntimeExtension => {
            DiscoveryMode::Annotated
        }
        BeansXml::Absent if config.enable_implicit_archives => DiscoveryMode::Annotated,
        BeansXml::Absent => DiscoveryMode::None,
    }
}
