use beanscope_api::{ArchiveId, ScopeId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("archive {0} has not been scanned yet")]
    NotScanned(ArchiveId),
    #[error("archive {0} is already registered")]
    DuplicateArchive(ArchiveId),
    #[error("archive {0} cannot be made accessible to itself")]
    SelfReference(ArchiveId),
    #[error("unknown archive: {0}")]
    UnknownArchive(ArchiveId),
    #[error("unknown class-loading scope: {0}")]
    UnknownScope(ScopeId),
    #[error("unknown application: {0}")]
    UnknownApplication(String),
    #[error("invalid deployment descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
