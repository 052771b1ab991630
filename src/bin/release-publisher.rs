//! Release Publisher CLI
//!
//! Shared-drive release publishing assistant

use anyhow::Result;
use clap::{Parser, Subcommand};
use release_publisher::core::config_loader::{ConfigLoadOptions, ConfigLoader};
use release_publisher::coverage::{self, CoverageError, ReportFormat};
use release_publisher::{ConnectivityCheck, PublishOptions, PublishOutcome, ReleasePublisher};
use std::path::PathBuf;
use std::process;

/// Shared-drive release publishing assistant
#[derive(Parser)]
#[command(name = "release-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Shared-drive release publishing assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the release build to the shared drive
    Publish {
        /// Path to the XML project descriptor
        #[arg(long, value_name = "FILE")]
        project_file: Option<PathBuf>,

        /// Path to the release build output directory
        #[arg(long, value_name = "DIR")]
        build_dir: Option<PathBuf>,

        /// Shared directory that receives the archive
        #[arg(long, value_name = "DIR")]
        destination: Option<PathBuf>,

        /// Directory where the local archive is created
        #[arg(long, value_name = "DIR")]
        staging_dir: Option<PathBuf>,

        /// Config file (defaults to ./.release-publisher.yaml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Overwrite an existing destination archive without prompting
        #[arg(long)]
        overwrite: bool,

        /// Non-interactive mode (CI/CD); a conflict resolves as "no"
        #[arg(long)]
        non_interactive: bool,

        /// Skip the shared-drive connectivity pre-check
        #[arg(long)]
        skip_network_check: bool,
    },

    /// Check connectivity to the shared-drive host
    Check {
        /// Host to resolve (defaults to network.host from configuration)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Config file (defaults to ./.release-publisher.yaml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the line-coverage percentage from a coverage report
    Coverage {
        /// Report file (HTML summary or raw XML results)
        #[arg(value_name = "REPORT", default_value = "Report/index.html")]
        report: PathBuf,

        /// Report format: auto, html, or xml
        #[arg(short, long, default_value = "auto")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            project_file,
            build_dir,
            destination,
            staging_dir,
            config,
            overwrite,
            non_interactive,
            skip_network_check,
        } => {
            let options = PublishOptions {
                config_path: config,
                project_file,
                build_dir,
                destination_root: destination,
                staging_dir,
                overwrite,
                non_interactive,
                skip_network_check,
            };

            publish_command(options).await
        }
        Commands::Check { host, config } => check_command(host, config).await,
        Commands::Coverage { report, format } => coverage_command(report, &format).await,
    }
}

async fn publish_command(options: PublishOptions) -> Result<i32> {
    println!("\n📦 release-publisher\n");

    let mut publisher = ReleasePublisher::new(options);

    match publisher.publish().await {
        Ok(report) => match report.outcome {
            PublishOutcome::Published => {
                println!("-----------------------------------------------------------");
                println!("✅ Successfully published version {} to the shared drive", report.version);
                println!("-----------------------------------------------------------");
                println!("   {}", report.destination_path.display());
                Ok(0)
            }
            PublishOutcome::AbortedByUser => {
                println!("-----------------------------------------------------------");
                println!("🟡 Process aborted by user");
                println!("-----------------------------------------------------------");
                Ok(0)
            }
        },
        Err(e) => {
            eprintln!("\n❌ {}", e);
            for action in e.suggested_actions() {
                eprintln!("  - {}", action);
            }
            eprintln!("\n-----------------------------------------------------------");
            eprintln!("❌ Failed to publish the release to the shared drive");
            eprintln!("-----------------------------------------------------------");
            Ok(1)
        }
    }
}

async fn check_command(host: Option<String>, config_file: Option<PathBuf>) -> Result<i32> {
    println!("\n🌐 Connectivity check\n");

    let host = match host {
        Some(host) => host,
        None => {
            let load_options = ConfigLoadOptions {
                project_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
                config_file,
                cli_args: None,
                env: std::env::vars().collect(),
            };
            let config = ConfigLoader::load(load_options).await?;

            match config.network.and_then(|n| n.host) {
                Some(host) => host,
                None => {
                    eprintln!("⚠️  No host configured (use --host or network.host)");
                    return Ok(1);
                }
            }
        }
    };

    match ConnectivityCheck::new(host.clone()).verify().await {
        Ok(()) => {
            println!("✅ '{}' resolved", host);
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("  - Are you connected to the VPN?");
            Ok(1)
        }
    }
}

async fn coverage_command(report: PathBuf, format: &str) -> Result<i32> {
    let format = match format {
        "auto" => None,
        "html" => Some(ReportFormat::Html),
        "xml" => Some(ReportFormat::Xml),
        other => {
            eprintln!("⚠️  Unknown format '{}' (expected auto, html, or xml)", other);
            return Ok(1);
        }
    };

    match coverage::extract(&report, format).await {
        Ok(value) => {
            println!("Coverage: {}", value);
            Ok(0)
        }
        Err(e) => {
            if let CoverageError::FieldNotFound { .. } = &e {
                eprintln!(
                    "The report layout may have changed; update the fixed lookup in src/coverage and re-run."
                );
            }
            Err(e.into())
        }
    }
}
