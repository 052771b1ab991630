//! Publishing orchestration
//!
//! The release publisher drives the whole pipeline: configuration, the
//! connectivity pre-check, version resolution, pruning, archiving, and the
//! transfer to the shared drive.

pub mod release_publisher;

pub use release_publisher::{PublishOptions, PublishOutcome, PublishReport, ReleasePublisher};
