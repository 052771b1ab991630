//! Release Publisher - Main orchestrator for shared-drive publishing
//!
//! Manages the complete publishing workflow in its required order:
//! - Configuration loading and merging
//! - Connectivity pre-check (advisory, before any destructive step)
//! - Version resolution from the project descriptor
//! - Pruning of non-distributable build artifacts
//! - Archive creation
//! - Conflict check and transfer to the shared destination
//!
//! There is no retry and no rollback: completed steps stay completed, and
//! the first failure aborts the run.

use crate::core::config::PublisherConfig;
use crate::core::config_loader::{ConfigLoadOptions, ConfigLoader};
use crate::core::error::PublishError;
use crate::core::traits::{ConsoleDecisionProvider, DecisionProvider, StaticDecisionProvider};
use crate::descriptor::ProjectDescriptor;
use crate::staging::{BuildOutputPruner, ExclusionPatterns, ReleaseArchiver};
use crate::transfer::{ConnectivityCheck, SharedDriveTransfer, TransferOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Publishing options passed from CLI or config
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,

    /// Path to the XML project descriptor
    pub project_file: Option<PathBuf>,

    /// Path to the release build output directory
    pub build_dir: Option<PathBuf>,

    /// Shared directory receiving the archive
    pub destination_root: Option<PathBuf>,

    /// Directory where the local archive is created
    pub staging_dir: Option<PathBuf>,

    /// Overwrite an existing destination archive without asking
    pub overwrite: bool,

    /// Non-interactive mode: a conflict resolves as "no"
    pub non_interactive: bool,

    /// Skip the connectivity pre-check
    pub skip_network_check: bool,
}

impl PublishOptions {
    /// Convert the path-valued options into a config layer for the loader
    fn to_cli_config(&self) -> Option<PublisherConfig> {
        use crate::core::config::{
            DestinationConfig, ProjectConfig, PublishOptionsConfig,
        };

        if self.project_file.is_none()
            && self.build_dir.is_none()
            && self.destination_root.is_none()
            && self.staging_dir.is_none()
        {
            return None;
        }

        // Sparse overlay: only the options actually given may override the
        // file and environment layers.
        let mut config = PublisherConfig::overlay();

        if self.project_file.is_some() || self.build_dir.is_some() {
            config.project = Some(ProjectConfig {
                descriptor_file: self.project_file.clone(),
                build_dir: self.build_dir.clone(),
            });
        }

        if let Some(root) = &self.destination_root {
            config.destination = Some(DestinationConfig {
                root: Some(root.clone()),
            });
        }

        if let Some(staging_dir) = &self.staging_dir {
            config.publish = Some(PublishOptionsConfig {
                confirm: None,
                staging_dir: Some(staging_dir.clone()),
            });
        }

        Some(config)
    }
}

/// Terminal state of a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The archive exists at the destination
    Published,

    /// The operator declined to overwrite; nothing was transferred
    AbortedByUser,
}

/// Publishing report returned after a publish run
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub outcome: PublishOutcome,
    pub version: String,
    pub archive_path: PathBuf,
    pub destination_path: PathBuf,
    pub pruned_files: Vec<PathBuf>,
    pub pruned_directories: Vec<PathBuf>,
    pub archived_files: usize,
    pub archive_bytes: u64,
    pub warnings: Vec<String>,
    pub duration: u64,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Effective settings after merging options and configuration
struct ResolvedSettings {
    descriptor_file: PathBuf,
    build_dir: PathBuf,
    destination_root: PathBuf,
    staging_dir: PathBuf,
    network_enabled: bool,
    network_host: Option<String>,
    confirm: bool,
}

/// Main release publisher orchestrator
pub struct ReleasePublisher {
    options: PublishOptions,
    config: Option<PublisherConfig>,
    decision: Option<Arc<dyn DecisionProvider>>,
}

impl ReleasePublisher {
    /// Create a new ReleasePublisher
    pub fn new(options: PublishOptions) -> Self {
        Self {
            options,
            config: None,
            decision: None,
        }
    }

    /// Replace the interactive prompt with a custom decision provider
    pub fn with_decision_provider(mut self, decision: Arc<dyn DecisionProvider>) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Load configuration from files, environment, and CLI options
    pub async fn load_config(&mut self) -> Result<(), PublishError> {
        let project_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let load_options = ConfigLoadOptions {
            project_path,
            config_file: self.options.config_path.clone(),
            cli_args: self.options.to_cli_config(),
            env: std::env::vars().collect(),
        };

        self.config = Some(ConfigLoader::load(load_options).await?);

        Ok(())
    }

    /// Publish the release build to the shared destination
    ///
    /// # Returns
    ///
    /// Publishing report with detailed results. A declined overwrite is a
    /// successful report with `PublishOutcome::AbortedByUser`, not an error.
    pub async fn publish(&mut self) -> Result<PublishReport, PublishError> {
        let start_time = Instant::now();
        let mut warnings = Vec::new();

        // 1. Load configuration
        if self.config.is_none() {
            self.load_config().await?;
        }
        let settings = self.resolve_settings()?;

        // 2. Connectivity pre-check, before any destructive step
        if self.options.skip_network_check {
            warnings.push("connectivity pre-check skipped".to_string());
        } else if settings.network_enabled
            && let Some(host) = &settings.network_host
        {
            println!("🌐 Checking connection to '{}'...", host);

            let check = ConnectivityCheck::new(host.clone());
            if let Err(e) = check.verify().await {
                println!("  ❌ Name resolution failed");
                println!("  ⚠️  Are you connected to the VPN?\n");
                return Err(e);
            }

            println!("  ✅ OK\n");
        }

        // 3. Resolve version from the project descriptor
        let descriptor = ProjectDescriptor::load(&settings.descriptor_file).await?;
        let version = descriptor.version().to_string();

        println!("• Release version: {}\n", version);

        // 4. Prune the build output
        println!("🧹 Deleting unnecessary files in the release build folder...");

        let patterns =
            ExclusionPatterns::from_config(self.config.as_ref().and_then(|c| c.prune.as_ref()));
        let prune_report = BuildOutputPruner::new(patterns).prune(&settings.build_dir)?;

        for path in prune_report
            .deleted_files
            .iter()
            .chain(prune_report.deleted_directories.iter())
        {
            println!("  - Deleted {}", path.display());
        }
        if prune_report.deleted_count() == 0 {
            println!("  (nothing to delete)");
        }
        println!();

        // 5. Create the versioned archive
        println!("📦 Zipping local files...");

        let archive_name = format!("{}.zip", version);
        let archive_path = settings.staging_dir.join(&archive_name);
        let summary = ReleaseArchiver::create(&settings.build_dir, &archive_path)?;

        println!(
            "  ✅ {} files -> '{}' ({})\n",
            summary.files,
            archive_path.display(),
            summary.size_display()
        );

        // 6. Conflict check and transfer
        println!(
            "📤 Delivering '{}' ({}) to the shared drive...",
            archive_name,
            summary.size_display()
        );

        let transfer = SharedDriveTransfer::new(self.effective_decision_provider(settings.confirm));
        let outcome = transfer
            .deliver(&archive_path, &settings.destination_root, &archive_name)
            .await?;

        // 7. Report
        let (outcome, destination_path, published_at) = match outcome {
            TransferOutcome::Delivered { destination } => {
                println!("  ✅ Copied to '{}'\n", destination.display());
                (
                    PublishOutcome::Published,
                    destination,
                    Some(chrono::Utc::now()),
                )
            }
            TransferOutcome::AbortedByUser { destination } => {
                println!("  Skipped at the operator's request.\n");
                (PublishOutcome::AbortedByUser, destination, None)
            }
        };

        Ok(PublishReport {
            outcome,
            version,
            archive_path,
            destination_path,
            pruned_files: prune_report.deleted_files,
            pruned_directories: prune_report.deleted_directories,
            archived_files: summary.files,
            archive_bytes: summary.bytes,
            warnings,
            duration: start_time.elapsed().as_millis() as u64,
            published_at,
        })
    }

    /// Merge options with configuration into concrete settings
    fn resolve_settings(&self) -> Result<ResolvedSettings, PublishError> {
        let config = self.config.as_ref().ok_or_else(|| PublishError::ConfigError {
            message: "configuration not loaded".to_string(),
        })?;

        let missing = |field: &str| PublishError::ConfigError {
            message: format!("{} is not configured (set it in .release-publisher.yaml or on the command line)", field),
        };

        let descriptor_file = config
            .project
            .as_ref()
            .and_then(|p| p.descriptor_file.clone())
            .ok_or_else(|| missing("project.descriptorFile"))?;

        let build_dir = config
            .project
            .as_ref()
            .and_then(|p| p.build_dir.clone())
            .ok_or_else(|| missing("project.buildDir"))?;

        let destination_root = config
            .destination
            .as_ref()
            .and_then(|d| d.root.clone())
            .ok_or_else(|| missing("destination.root"))?;

        let staging_dir = match config.publish.as_ref().and_then(|p| p.staging_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| PublishError::ConfigError {
                message: format!("failed to resolve the current working directory: {}", e),
            })?,
        };

        let network = config.network.as_ref();

        Ok(ResolvedSettings {
            descriptor_file,
            build_dir,
            destination_root,
            staging_dir,
            network_enabled: network.and_then(|n| n.enabled).unwrap_or(true),
            network_host: network.and_then(|n| n.host.clone()),
            confirm: config
                .publish
                .as_ref()
                .and_then(|p| p.confirm)
                .unwrap_or(true),
        })
    }

    /// Pick the decision provider for the conflict prompt
    ///
    /// Priority: injected provider, then `--overwrite` (always "yes"), then
    /// `--non-interactive` (always "no"), then `publish.confirm: false`
    /// (always "yes"), then the interactive console prompt.
    fn effective_decision_provider(&self, confirm: bool) -> Arc<dyn DecisionProvider> {
        if let Some(decision) = &self.decision {
            return decision.clone();
        }

        if self.options.overwrite {
            Arc::new(StaticDecisionProvider::new(true))
        } else if self.options.non_interactive {
            Arc::new(StaticDecisionProvider::new(false))
        } else if !confirm {
            Arc::new(StaticDecisionProvider::new(true))
        } else {
            Arc::new(ConsoleDecisionProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::Path;

    struct Fixture {
        _root: tempfile::TempDir,
        options: PublishOptions,
        build_dir: PathBuf,
        staging_dir: PathBuf,
        destination_root: PathBuf,
    }

    fn fixture(descriptor_xml: &str) -> Fixture {
        let root = tempfile::tempdir().unwrap();

        let descriptor = root.path().join("App.csproj");
        std::fs::write(&descriptor, descriptor_xml).unwrap();

        let build_dir = root.path().join("bin/Release/net6.0-windows");
        std::fs::create_dir_all(build_dir.join("lib")).unwrap();
        std::fs::write(build_dir.join("App.dll"), b"app bytes").unwrap();
        std::fs::write(build_dir.join("App.pdb"), b"symbols").unwrap();
        std::fs::write(build_dir.join("lib/helper.dll"), b"helper bytes").unwrap();

        let staging_dir = root.path().join("staging");
        std::fs::create_dir(&staging_dir).unwrap();

        let destination_root = root.path().join("shared");
        std::fs::create_dir(&destination_root).unwrap();

        let options = PublishOptions {
            project_file: Some(descriptor),
            build_dir: Some(build_dir.clone()),
            destination_root: Some(destination_root.clone()),
            staging_dir: Some(staging_dir.clone()),
            skip_network_check: true,
            ..Default::default()
        };

        Fixture {
            _root: root,
            options,
            build_dir,
            staging_dir,
            destination_root,
        }
    }

    const DESCRIPTOR: &str =
        "<Project><PropertyGroup><Version>1.2.3</Version></PropertyGroup></Project>";

    fn archive_names(path: &Path) -> Vec<String> {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_publish_happy_path() {
        let fx = fixture(DESCRIPTOR);

        let mut publisher = ReleasePublisher::new(fx.options.clone());
        let report = publisher.publish().await.unwrap();

        assert_eq!(report.outcome, PublishOutcome::Published);
        assert_eq!(report.version, "1.2.3");
        assert_eq!(report.archived_files, 2);
        assert_eq!(report.pruned_files.len(), 1);
        assert!(report.published_at.is_some());

        // Local archive and delivered archive both exist
        let local = fx.staging_dir.join("1.2.3.zip");
        let delivered = fx.destination_root.join("1.2.3.zip");
        assert!(local.exists());
        assert!(delivered.exists());

        // The pruned symbol file neither survived nor got archived
        assert!(!fx.build_dir.join("App.pdb").exists());
        assert_eq!(archive_names(&delivered), vec!["App.dll", "lib/helper.dll"]);
    }

    #[tokio::test]
    async fn test_publish_conflict_declined() {
        let fx = fixture(DESCRIPTOR);
        let existing = fx.destination_root.join("1.2.3.zip");
        std::fs::write(&existing, b"previous release").unwrap();

        let mut publisher = ReleasePublisher::new(fx.options.clone())
            .with_decision_provider(Arc::new(StaticDecisionProvider::new(false)));
        let report = publisher.publish().await.unwrap();

        assert_eq!(report.outcome, PublishOutcome::AbortedByUser);
        assert!(report.published_at.is_none());

        // Destination byte-identical to before, local archive intact
        assert_eq!(std::fs::read(&existing).unwrap(), b"previous release");
        assert!(fx.staging_dir.join("1.2.3.zip").exists());
    }

    #[tokio::test]
    async fn test_publish_conflict_accepted() {
        let fx = fixture(DESCRIPTOR);
        let existing = fx.destination_root.join("1.2.3.zip");
        std::fs::write(&existing, b"previous release").unwrap();

        let mut publisher = ReleasePublisher::new(fx.options.clone())
            .with_decision_provider(Arc::new(StaticDecisionProvider::new(true)));
        let report = publisher.publish().await.unwrap();

        assert_eq!(report.outcome, PublishOutcome::Published);

        let local = std::fs::read(fx.staging_dir.join("1.2.3.zip")).unwrap();
        let delivered = std::fs::read(&existing).unwrap();
        assert_eq!(local, delivered);
    }

    #[tokio::test]
    async fn test_overwrite_flag_resolves_conflict() {
        let fx = fixture(DESCRIPTOR);
        std::fs::write(fx.destination_root.join("1.2.3.zip"), b"previous").unwrap();

        let mut options = fx.options.clone();
        options.overwrite = true;

        let mut publisher = ReleasePublisher::new(options);
        let report = publisher.publish().await.unwrap();

        assert_eq!(report.outcome, PublishOutcome::Published);
    }

    #[tokio::test]
    async fn test_non_interactive_flag_declines_conflict() {
        let fx = fixture(DESCRIPTOR);
        std::fs::write(fx.destination_root.join("1.2.3.zip"), b"previous").unwrap();

        let mut options = fx.options.clone();
        options.non_interactive = true;

        let mut publisher = ReleasePublisher::new(options);
        let report = publisher.publish().await.unwrap();

        assert_eq!(report.outcome, PublishOutcome::AbortedByUser);
    }

    #[tokio::test]
    async fn test_malformed_descriptor_aborts_before_side_effects() {
        let fx = fixture("<Project><PropertyGroup><Version>1.0");

        let mut publisher = ReleasePublisher::new(fx.options.clone());
        let err = publisher.publish().await.unwrap_err();

        assert_eq!(err.code(), "DESCRIPTOR_PARSE_FAILED");

        // Nothing was deleted, nothing was archived
        assert!(fx.build_dir.join("App.pdb").exists());
        assert_eq!(std::fs::read_dir(&fx.staging_dir).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(&fx.destination_root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_destination_is_a_config_error() {
        let fx = fixture(DESCRIPTOR);

        let mut options = fx.options.clone();
        options.destination_root = None;

        let mut publisher = ReleasePublisher::new(options);
        let err = publisher.publish().await.unwrap_err();

        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("destination.root"));
    }

    #[tokio::test]
    async fn test_skip_network_check_records_warning() {
        let fx = fixture(DESCRIPTOR);

        let mut publisher = ReleasePublisher::new(fx.options.clone());
        let report = publisher.publish().await.unwrap();

        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("pre-check skipped")));
    }

    #[tokio::test]
    async fn test_report_archive_matches_pruned_tree() {
        let fx = fixture(DESCRIPTOR);

        let mut publisher = ReleasePublisher::new(fx.options.clone());
        let report = publisher.publish().await.unwrap();

        // Round-trip: archive entries reproduce the pruned tree
        let file = std::fs::File::open(&report.archive_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();

        let mut content = Vec::new();
        archive
            .by_name("lib/helper.dll")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"helper bytes");
    }
}
