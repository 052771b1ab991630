//! Project Descriptor - Resolves the release version from the project file
//!
//! The descriptor is an XML document (an MSBuild-style project file) whose
//! version lives at the fixed path `PropertyGroup` → `Version`, both direct
//! children in document order. The text is returned exactly as written; no
//! trimming or reformatting is applied, since the value is only a naming key
//! for the release archive.

use crate::core::error::PublishError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Parsed project descriptor
#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    path: PathBuf,
    version: String,
}

impl ProjectDescriptor {
    /// Read and parse the descriptor at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the XML project descriptor
    pub async fn load(path: &Path) -> Result<Self, PublishError> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PublishError::DescriptorNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PublishError::DescriptorParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;

        let version = Self::resolve_version(&content, path)?;

        Ok(Self {
            path: path.to_path_buf(),
            version,
        })
    }

    /// Locate `PropertyGroup` → `Version` in the document
    fn resolve_version(content: &str, path: &Path) -> Result<String, PublishError> {
        let document =
            roxmltree::Document::parse(content).map_err(|e| PublishError::DescriptorParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        // The first PropertyGroup is the fixed lookup position; a descriptor
        // whose first group lacks a Version element is rejected rather than
        // searched further.
        document
            .root_element()
            .children()
            .find(|n| n.is_element() && n.has_tag_name("PropertyGroup"))
            .and_then(|group| {
                group
                    .children()
                    .find(|n| n.is_element() && n.has_tag_name("Version"))
            })
            .and_then(|version| version.text())
            .map(|text| text.to_string())
            .ok_or_else(|| PublishError::VersionMissing {
                path: path.to_path_buf(),
            })
    }

    /// The version string, exactly as written in the descriptor
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Path the descriptor was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}
