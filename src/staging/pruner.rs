//! Build Output Pruner - Removes non-distributable entries before archiving
//!
//! The release build folder accumulates artifacts that must not ship:
//! packed-bundle duplicates, debug-symbol files, and site-specific artifacts
//! named in configuration. Pruning enumerates the directory's top level and
//! deletes matching files; configured directory names are removed
//! recursively. Nested files are never matched individually.

use crate::core::config::PruneConfig;
use crate::core::error::PublishError;
use std::fs;
use std::path::{Path, PathBuf};

/// Exclusion set applied to build output entries
///
/// A file is excluded when its name contains one of the markers, ends with
/// one of the extensions, or equals one of the exact names.
#[derive(Debug, Clone)]
pub struct ExclusionPatterns {
    markers: Vec<String>,
    extensions: Vec<String>,
    names: Vec<String>,
    directories: Vec<String>,
}

impl ExclusionPatterns {
    /// Build the effective pattern set from configuration
    ///
    /// Fields absent from the configuration fall back to the shipped
    /// defaults (`packed` marker, `.pdb` extension).
    pub fn from_config(config: Option<&PruneConfig>) -> Self {
        let defaults = PruneConfig::default_patterns();

        Self {
            markers: config
                .and_then(|c| c.markers.clone())
                .or(defaults.markers)
                .unwrap_or_default(),
            extensions: config
                .and_then(|c| c.extensions.clone())
                .or(defaults.extensions)
                .unwrap_or_default(),
            names: config
                .and_then(|c| c.names.clone())
                .or(defaults.names)
                .unwrap_or_default(),
            directories: config
                .and_then(|c| c.directories.clone())
                .or(defaults.directories)
                .unwrap_or_default(),
        }
    }

    /// Does a file with this name get deleted?
    pub fn matches_file(&self, name: &str) -> bool {
        self.markers.iter().any(|marker| name.contains(marker))
            || self.extensions.iter().any(|ext| name.ends_with(ext))
            || self.names.iter().any(|exact| name == exact)
    }

    /// Does a top-level directory with this name get removed?
    pub fn matches_directory(&self, name: &str) -> bool {
        self.directories.iter().any(|exact| name == exact)
    }
}

impl Default for ExclusionPatterns {
    fn default() -> Self {
        Self::from_config(None)
    }
}

/// Report of what pruning deleted
#[derive(Debug, Clone, Default)]
pub struct PruneReport {
    pub deleted_files: Vec<PathBuf>,
    pub deleted_directories: Vec<PathBuf>,
}

impl PruneReport {
    /// Total number of deleted entries
    pub fn deleted_count(&self) -> usize {
        self.deleted_files.len() + self.deleted_directories.len()
    }
}

/// Deletes excluded entries from the build output directory
pub struct BuildOutputPruner {
    patterns: ExclusionPatterns,
}

impl BuildOutputPruner {
    pub fn new(patterns: ExclusionPatterns) -> Self {
        Self { patterns }
    }

    /// Prune `build_dir` in place and report the deleted entries
    ///
    /// Deletion failures (permissions, files in use) propagate as fatal;
    /// entries already deleted stay deleted.
    pub fn prune(&self, build_dir: &Path) -> Result<PruneReport, PublishError> {
        let mut report = PruneReport::default();

        let entries = fs::read_dir(build_dir).map_err(|e| PublishError::PruneFailed {
            path: build_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| PublishError::PruneFailed {
                path: build_dir.to_path_buf(),
                message: e.to_string(),
            })?;

            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().map_err(|e| PublishError::PruneFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;

            if file_type.is_dir() {
                if self.patterns.matches_directory(&name) {
                    fs::remove_dir_all(&path).map_err(|e| PublishError::PruneFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                    report.deleted_directories.push(path);
                }
            } else if self.patterns.matches_file(&name) {
                fs::remove_file(&path).map_err(|e| PublishError::PruneFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                report.deleted_files.push(path);
            }
        }

        Ok(report)
    }
}
