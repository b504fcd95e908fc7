use crate::models::{ArchiveId, ClassName};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("class {class} could not be loaded from archive {archive}")]
    ClassNotFound { class: ClassName, archive: ArchiveId },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
