//! Build output staging: pruning and archiving

pub mod archiver;
pub mod pruner;

pub use archiver::{ArchiveSummary, ReleaseArchiver};
pub use pruner::{BuildOutputPruner, ExclusionPatterns, PruneReport};
