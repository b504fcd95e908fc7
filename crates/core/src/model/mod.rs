pub mod graph;
pub mod record;
pub mod scope;

pub use graph::{ArchiveGraph, ArchiveNode};
pub use record::DiscoveryRecord;
pub use scope::ScopeHierarchy;
