pub mod core;
pub mod coverage;
pub mod descriptor;
pub mod orchestration;
pub mod staging;
pub mod transfer;

pub use crate::core::*;
pub use crate::descriptor::ProjectDescriptor;
pub use crate::orchestration::{PublishOptions, PublishOutcome, PublishReport, ReleasePublisher};
pub use crate::staging::{
    ArchiveSummary, BuildOutputPruner, ExclusionPatterns, PruneReport, ReleaseArchiver,
};
pub use crate::transfer::{ConnectivityCheck, SharedDriveTransfer, TransferOutcome};
