use anyhow::Context;
use beanscope_api::DiscoveryReport;
use beanscope_core::{DeploymentDescriptor, DeploymentRegistry};
use std::path::Path;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::info;

#[derive(Tabled)]
struct ArchiveRow {
    #[tabled(rename = "Archive")]
    archive: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Annotations")]
    annotations: usize,
    #[tabled(rename = "Candidates")]
    candidates: String,
}

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let report = scan_descriptor(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&report));
        println!(
            "{} candidate classes across {} archives",
            report.candidate_count(),
            report.archives.len()
        );
    }
    Ok(())
}

pub(crate) fn scan_descriptor(path: &Path) -> anyhow::Result<DiscoveryReport> {
    let descriptor = DeploymentDescriptor::from_path(path)
        .with_context(|| format!("failed to load descriptor {}", path.display()))?;
    info!(
        "Scanning application {} ({} archives)",
        descriptor.application,
        descriptor.archives.len()
    );

    let registry = DeploymentRegistry::new(descriptor.config.clone());
    let graph = descriptor.build_graph(Arc::clone(registry.cache()))?;
    registry.install(&descriptor.application, graph);
    Ok(registry.scan_application(&descriptor.application)?)
}

/// Rows follow scan order, so an archive appears after everything it sees.
pub(crate) fn render(report: &DiscoveryReport) -> String {
    let rows: Vec<ArchiveRow> = report
        .scan_order
        .iter()
        .filter_map(|id| report.archive(id.as_str()))
        .map(|a| ArchiveRow {
            archive: a.id.to_string(),
            kind: a.kind.to_string(),
            mode: a.mode.map(|m| m.to_string()).unwrap_or_else(|| "-".into()),
            annotations: a.direct_annotations.len(),
            candidates: if a.candidate_classes.is_empty() {
                "-".to_string()
            } else {
                a.candidate_classes.join("\n")
            },
        })
        .collect();

    Table::new(rows).with(Style::psql()).to_string()
}
