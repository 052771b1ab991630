//! Archive delivery to the shared destination

pub mod connectivity;
pub mod shared_drive;

pub use connectivity::ConnectivityCheck;
pub use shared_drive::{SharedDriveTransfer, TransferOutcome};
