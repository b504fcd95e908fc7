//! Per-application deployment graphs.
//!
//! Each application owns a disjoint archive graph guarded by its own mutex,
//! so different applications can be scanned on different threads while a
//! single graph is only ever scanned by one thread at a time. The
//! runtime-extension cache is shared by every graph.

use crate::cache::ExtensionClassCache;
use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::model::ArchiveGraph;
use beanscope_api::DiscoveryReport;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

pub type SharedGraph = Arc<Mutex<ArchiveGraph>>;

pub struct DeploymentRegistry {
    config: Arc<DiscoveryConfig>,
    cache: Arc<ExtensionClassCache>,
    applications: DashMap<String, SharedGraph>,
}

impl DeploymentRegistry {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(ExtensionClassCache::new()),
            applications: DashMap::new(),
        }
    }

    pub fn config(&self) -> &Arc<DiscoveryConfig> {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ExtensionClassCache> {
        &self.cache
    }

    /// Graph for `application`, created empty on first use.
    pub fn deploy(&self, application: &str) -> SharedGraph {
        let graph = self
            .applications
            .entry(application.to_string())
            .or_insert_with(|| {
                info!("Deploying application {}", application);
                Arc::new(Mutex::new(ArchiveGraph::new(
                    Arc::clone(&self.config),
                    Arc::clone(&self.cache),
                )))
            });
        Arc::clone(graph.value())
    }

    /// Installs a pre-built graph for `application`, replacing any previous one.
    pub fn install(&self, application: &str, graph: ArchiveGraph) -> SharedGraph {
        let shared = Arc::new(Mutex::new(graph));
        self.applications
            .insert(application.to_string(), Arc::clone(&shared));
        shared
    }

    pub fn graph(&self, application: &str) -> Result<SharedGraph> {
        self.applications
            .get(application)
            .map(|g| Arc::clone(g.value()))
            .ok_or_else(|| DiscoveryError::UnknownApplication(application.to_string()))
    }

    /// Scans the whole graph of `application` under its exclusive lock.
    pub fn scan_application(&self, application: &str) -> Result<DiscoveryReport> {
        let shared = self.graph(application)?;
        let mut graph = lock(&shared)?;
        graph.scan_all();
        Ok(graph.report())
    }

    /// Drops the application's graph. The extension cache outlives it.
    pub fn undeploy(&self, application: &str) -> bool {
        let removed = self.applications.remove(application).is_some();
        if removed {
            info!("Undeployed application {}", application);
        }
        removed
    }

    pub fn applications(&self) -> Vec<String> {
        let mut names: Vec<String> = self.applications.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

impl Default for DeploymentRegistry {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}

pub fn lock(graph: &SharedGraph) -> Result<MutexGuard<'_, ArchiveGraph>> {
    graph
        .lock()
        .map_err(|e| DiscoveryError::Internal(format!("deployment graph lock poisoned: {e}")))
}
