use beanscope_api::{ArchiveId, DiscoveryMode};
use beanscope_core::{ArchiveGraph, StaticArchive};
use std::sync::Arc;

#[allow(dead_code)]
pub const APPLICATION_SCOPED: &str = "jakarta.enterprise.context.ApplicationScoped";

#[allow(dead_code)]
pub fn ids(names: &[&str]) -> Vec<ArchiveId> {
    names.iter().map(|n| ArchiveId::new(n)).collect()
}

#[allow(dead_code)]
pub fn id(name: &str) -> ArchiveId {
    ArchiveId::new(name)
}

/// Mode `all` archive with a single class named after it.
#[allow(dead_code)]
pub fn all_mode(name: &str) -> Arc<StaticArchive> {
    Arc::new(
        StaticArchive::builder(name, "app")
            .mode(DiscoveryMode::All)
            .class(&format!("{name}.Bean"), &[])
            .build(),
    )
}

/// Registers `edges` as `(from, [to...])` in order, each archive built by `make`.
#[allow(dead_code)]
pub fn build_graph(
    edges: &[(&str, Vec<&str>)],
    make: impl Fn(&str) -> Arc<StaticArchive>,
) -> ArchiveGraph {
    let mut graph = ArchiveGraph::with_defaults();
    for (from, _) in edges {
        graph.register_archive(make(from), &[]).unwrap();
    }
    for (from, targets) in edges {
        for to in targets {
            graph.add_edge(&id(from), &id(to)).unwrap();
        }
    }
    graph
}
