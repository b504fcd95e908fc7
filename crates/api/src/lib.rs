pub mod archive;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use archive::{Archive, ArchiveRef};
pub use error::{ApiError, ApiResult};
pub use models::*;
