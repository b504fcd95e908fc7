pub mod archive;
pub mod class;
pub mod report;

pub use archive::*;
pub use class::*;
pub use report::*;
