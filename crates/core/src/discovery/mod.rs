//! The two discovery phases run for each archive.
//!
//! Phase 1 collects the marker annotations applicable to an archive
//! ([`annotations`]). Phase 2 turns them into candidate classes
//! ([`candidates`]) and decides which archive owns each loaded class
//! ([`ownership`]).

pub mod annotations;
pub mod candidates;
pub mod mode;
pub mod ownership;

pub use mode::resolve_mode;
