//! Shared Drive Transfer - Delivers the archive to the destination root
//!
//! The destination may already hold an archive for the same version; that
//! conflict is resolved by the configured `DecisionProvider` before anything
//! is written. The local archive is copied, never moved, so it remains in
//! the staging directory after a successful delivery.

use crate::core::error::PublishError;
use crate::core::traits::DecisionProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The archive now exists at the destination
    Delivered { destination: PathBuf },

    /// The operator declined to overwrite; both files are untouched
    AbortedByUser { destination: PathBuf },
}

/// Copies release archives onto the shared drive
pub struct SharedDriveTransfer {
    decision: Arc<dyn DecisionProvider>,
}

impl SharedDriveTransfer {
    pub fn new(decision: Arc<dyn DecisionProvider>) -> Self {
        Self { decision }
    }

    /// Deliver `archive` as `<destination_root>/<file_name>`
    ///
    /// On conflict the decision provider is consulted exactly once; a "no"
    /// answer is a terminal, non-error outcome. Without a conflict no
    /// question is asked.
    pub async fn deliver(
        &self,
        archive: &Path,
        destination_root: &Path,
        file_name: &str,
    ) -> Result<TransferOutcome, PublishError> {
        let destination = destination_root.join(file_name);

        let exists = fs::try_exists(&destination).await.map_err(|e| {
            PublishError::TransferFailed {
                source_path: archive.to_path_buf(),
                destination: destination.clone(),
                message: e.to_string(),
            }
        })?;

        if exists {
            println!("⚠️  File '{}' already exists.", destination.display());

            let overwrite = self
                .decision
                .confirm_overwrite(&destination)
                .await
                .map_err(|e| PublishError::PromptFailed {
                    message: e.to_string(),
                })?;

            if !overwrite {
                return Ok(TransferOutcome::AbortedByUser { destination });
            }
        }

        fs::copy(archive, &destination)
            .await
            .map_err(|e| PublishError::TransferFailed {
                source_path: archive.to_path_buf(),
                destination: destination.clone(),
                message: e.to_string(),
            })?;

        Ok(TransferOutcome::Delivered { destination })
    }
}
