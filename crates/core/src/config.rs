//! Engine configuration.
//!
//! Every field has a default so a deployment descriptor may omit the whole
//! `config` object or any part of it.

use beanscope_api::AnnotationName;
use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bean-defining annotations recognized in every archive, without the
/// `jakarta.`/`javax.` namespace prefix.
const BEAN_DEFINING: &[&str] = &[
    "enterprise.context.ApplicationScoped",
    "enterprise.context.SessionScoped",
    "enterprise.context.ConversationScoped",
    "enterprise.context.RequestScoped",
    "enterprise.context.Dependent",
    "enterprise.inject.Stereotype",
    "enterprise.inject.Model",
    "interceptor.Interceptor",
    "decorator.Decorator",
    "ejb.Stateless",
    "ejb.Stateful",
    "ejb.Singleton",
    "ejb.MessageDriven",
];

pub fn default_baseline_annotations() -> IndexSet<AnnotationName> {
    ["jakarta", "javax"]
        .iter()
        .flat_map(|ns| {
            BEAN_DEFINING
                .iter()
                .map(move |a| AnnotationName::from(format!("{ns}.{a}")))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Archives without beans.xml are scanned in `annotated` mode. When off
    /// they contribute nothing.
    pub enable_implicit_archives: bool,
    /// An empty beans.xml means `all`. When off it means `annotated`.
    pub empty_beans_xml_explicit: bool,
    /// Phase 1 unions in the direct annotations of accessible neighbors.
    pub include_accessible_annotations: bool,
    #[schemars(with = "Vec<String>")]
    pub baseline_annotations: IndexSet<AnnotationName>,
    /// Compute runtime-extension candidates once per process.
    pub cache_runtime_extensions: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enable_implicit_archives: true,
            empty_beans_xml_explicit: true,
            include_accessible_annotations: true,
            baseline_annotations: default_baseline_annotations(),
            cache_runtime_extensions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_covers_both_namespaces() {
        let baseline = default_baseline_annotations();
        assert!(baseline.contains("jakarta.enterprise.context.ApplicationScoped"));
        assert!(baseline.contains("javax.enterprise.context.ApplicationScoped"));
        assert!(baseline.contains("jakarta.ejb.Stateless"));
        assert_eq!(baseline.len(), BEAN_DEFINING.len() * 2);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: DiscoveryConfig =
            serde_json::from_str(r#"{ "enable_implicit_archives": false }"#).unwrap();
        assert!(!config.enable_implicit_archives);
        assert!(config.empty_beans_xml_explicit);
        assert_eq!(config.baseline_annotations, default_baseline_annotations());
    }
}
