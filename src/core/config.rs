//! Configuration structures and types for release-publisher
//!
//! This module provides type-safe configuration management with serde support.
//! Every path and host the publisher touches lives here instead of being
//! hard-coded in the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublisherConfig {
    /// Schema version (required)
    pub version: String,

    /// Variable definitions, usable as `${NAME}` in path/host strings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<HashMap<String, String>>,

    /// Project layout: descriptor file and build output directory (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectConfig>,

    /// Shared destination for release archives (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationConfig>,

    /// Exclusion patterns applied to the build output before archiving (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune: Option<PruneConfig>,

    /// Connectivity pre-check settings (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,

    /// Publish behavior options (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<PublishOptionsConfig>,
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectConfig {
    /// Path to the XML project descriptor holding PropertyGroup/Version
    #[serde(skip_serializing_if = "Option::is_none", rename = "descriptorFile")]
    pub descriptor_file: Option<PathBuf>,

    /// Path to the release build output directory
    #[serde(skip_serializing_if = "Option::is_none", rename = "buildDir")]
    pub build_dir: Option<PathBuf>,
}

/// Destination configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DestinationConfig {
    /// Shared directory that receives `<version>.zip`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Exclusion patterns for pruning the build output
///
/// An entry is deleted when its file name contains one of `markers`, ends
/// with one of `extensions`, or equals one of `names`. Top-level directories
/// whose name equals one of `directories` are removed recursively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PruneConfig {
    /// Substring markers (default: `packed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markers: Option<Vec<String>>,

    /// File name suffixes (default: `.pdb`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    /// Exact file names, e.g. a non-distributable add-in artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,

    /// Exact directory names removed recursively, e.g. `runtimes`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directories: Option<Vec<String>>,
}

/// Connectivity pre-check configuration
///
/// The check runs only when a host is configured; `enabled: false` turns it
/// off without removing the host entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NetworkConfig {
    /// Enable the pre-check (default: true when a host is configured)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Host name whose resolution indicates the shared drive is reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Publish behavior options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishOptionsConfig {
    /// Ask before overwriting an existing destination archive (default: true).
    /// `false` overwrites without asking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm: Option<bool>,

    /// Directory where the local archive is created
    /// (default: current working directory)
    #[serde(skip_serializing_if = "Option::is_none", rename = "stagingDir")]
    pub staging_dir: Option<PathBuf>,
}

/// Default configuration values
impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            variables: None,
            project: None,
            destination: None,
            prune: Some(PruneConfig::default_patterns()),
            network: None,
            publish: Some(PublishOptionsConfig::default()),
        }
    }
}

impl PublisherConfig {
    /// An overlay carrying no values of its own
    ///
    /// Higher-priority layers (environment variables, CLI arguments) start
    /// from this so that merging them never resets fields they did not set
    /// back to the shipped defaults.
    pub fn overlay() -> Self {
        Self {
            version: String::new(),
            variables: None,
            project: None,
            destination: None,
            prune: None,
            network: None,
            publish: None,
        }
    }
}

impl PruneConfig {
    /// The fixed exclusion set shipped by default: packed-bundle duplicates
    /// and debug symbols.
    pub fn default_patterns() -> Self {
        Self {
            markers: Some(vec!["packed".to_string()]),
            extensions: Some(vec![".pdb".to_string()]),
            names: None,
            directories: None,
        }
    }
}

impl Default for PublishOptionsConfig {
    fn default() -> Self {
        Self {
            confirm: Some(true),
            staging_dir: None,
        }
    }
}
