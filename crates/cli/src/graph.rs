use anyhow::Context;
use beanscope_core::{DeploymentDescriptor, ExtensionClassCache};
use std::path::Path;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EdgeRow {
    #[tabled(rename = "Archive")]
    archive: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Scope")]
    scope: String,
    #[tabled(rename = "Sees")]
    sees: String,
    #[tabled(rename = "Seen By")]
    seen_by: String,
}

pub fn run(path: &Path) -> anyhow::Result<()> {
    let descriptor = DeploymentDescriptor::from_path(path)
        .with_context(|| format!("failed to load descriptor {}", path.display()))?;
    let graph = descriptor.build_graph(Arc::new(ExtensionClassCache::new()))?;

    let join = |ids: Vec<beanscope_api::ArchiveId>| {
        if ids.is_empty() {
            "-".to_string()
        } else {
            ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
        }
    };

    let mut rows = Vec::with_capacity(graph.len());
    for id in graph.archive_ids() {
        let archive = graph.archive(&id)?;
        rows.push(EdgeRow {
            archive: id.to_string(),
            kind: archive.kind().to_string(),
            scope: archive.scope().to_string(),
            sees: join(graph.accessible_neighbors(&id)?),
            seen_by: join(graph.descendants(&id)?),
        });
    }

    println!("Application: {}", descriptor.application);
    println!("{}", Table::new(rows).with(Style::psql()));
    println!("{} archives, {} edges", graph.len(), graph.edge_count());
    Ok(())
}
