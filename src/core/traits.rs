//! Core traits for release publishing
//!
//! This module defines the decision-provider abstraction used when a release
//! archive collides with an existing file at the shared destination.

use async_trait::async_trait;
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

// ============================================================================
// Decision Provider Trait
// ============================================================================

/// Answers the overwrite question when the destination archive already exists
///
/// The publish pipeline never reads standard input directly; it asks a
/// `DecisionProvider`, so tests and non-interactive runs can supply a
/// deterministic answer.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Decide whether the existing file at `destination` may be overwritten
    ///
    /// Returns `true` for "overwrite", `false` for "leave it and abort".
    async fn confirm_overwrite(&self, destination: &Path) -> anyhow::Result<bool>;
}

// ============================================================================
// Console Provider
// ============================================================================

/// Interactive provider reading a yes/no answer from standard input
///
/// `y`/`yes` (trimmed, case-insensitive) is affirmative; anything else,
/// including an empty line, means "no".
pub struct ConsoleDecisionProvider;

#[async_trait]
impl DecisionProvider for ConsoleDecisionProvider {
    async fn confirm_overwrite(&self, _destination: &Path) -> anyhow::Result<bool> {
        let mut stdout = io::stdout();
        stdout
            .write_all("   □ Would you like to overwrite the file? (y/n): ".as_bytes())
            .await?;
        stdout.flush().await?;

        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut answer = String::new();

        reader.read_line(&mut answer).await?;

        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

// ============================================================================
// Static Provider
// ============================================================================

/// Non-interactive provider returning a fixed answer
///
/// Backs `--overwrite` (always "yes") and `--non-interactive` (always "no"),
/// and serves as the deterministic test double.
pub struct StaticDecisionProvider {
    answer: bool,
}

impl StaticDecisionProvider {
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl DecisionProvider for StaticDecisionProvider {
    async fn confirm_overwrite(&self, _destination: &Path) -> anyhow::Result<bool> {
        Ok(self.answer)
    }
}
