pub mod cache;
pub mod config;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod growth;
pub mod logging;
pub mod model;
pub mod registry;
pub mod scheduler;

pub use cache::ExtensionClassCache;
pub use config::DiscoveryConfig;
pub use descriptor::{ArchiveSpec, ClassSpec, DeploymentDescriptor, ScopeSpec, StaticArchive};
pub use error::{DiscoveryError, Result};
pub use growth::OnDemandArchive;
pub use model::{ArchiveGraph, DiscoveryRecord, ScopeHierarchy};
pub use registry::DeploymentRegistry;
