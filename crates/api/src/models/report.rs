use super::archive::{AnnotationName, ArchiveId, ArchiveKind, ClassName, DiscoveryMode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Discovery results for a single archive.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ArchiveReport {
    pub id: ArchiveId,
    pub kind: ArchiveKind,
    pub mode: Option<DiscoveryMode>,
    pub visited: bool,
    pub scanned: bool,
    #[schemars(with = "Vec<String>")]
    pub direct_annotations: Vec<AnnotationName>,
    #[schemars(with = "Vec<String>")]
    pub candidate_classes: Vec<ClassName>,
    pub accessible: Vec<ArchiveId>,
    pub descendants: Vec<ArchiveId>,
}

/// Discovery results for a whole deployment graph, in registration order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
pub struct DiscoveryReport {
    pub archives: Vec<ArchiveReport>,
    /// Order in which archives completed both discovery phases.
    pub scan_order: Vec<ArchiveId>,
}

impl DiscoveryReport {
    pub fn archive(&self, id: &str) -> Option<&ArchiveReport> {
        self.archives.iter().find(|a| a.id.as_str() == id)
    }

    /// Every owned candidate class paired with its owning archive.
    pub fn all_candidates(&self) -> Vec<(ClassName, ArchiveId)> {
        self.archives
            .iter()
            .flat_map(|a| {
                a.candidate_classes
                    .iter()
                    .map(move |c| (c.clone(), a.id.clone()))
            })
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.archives.iter().map(|a| a.candidate_classes.len()).sum()
    }
}
