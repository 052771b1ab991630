//! Release Archiver - Zips the pruned build output
//!
//! Every file under the build output directory is written into a single
//! deflate-compressed archive. Entry names are the file paths relative to
//! the directory root, `/`-separated, so extracting the archive reproduces
//! the tree exactly. Empty directories are not recorded.

use crate::core::error::PublishError;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Summary of a created archive
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    /// Where the archive was written
    pub archive_path: PathBuf,

    /// Number of files stored
    pub files: usize,

    /// Size of the finished archive in bytes
    pub bytes: u64,
}

impl ArchiveSummary {
    /// Human-readable archive size, e.g. `12.34MB`
    pub fn size_display(&self) -> String {
        format!("{:.2}MB", self.bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Creates the versioned release archive
pub struct ReleaseArchiver;

impl ReleaseArchiver {
    /// Walk `build_dir` recursively and write its files to `archive_path`
    ///
    /// # Arguments
    ///
    /// * `build_dir` - Root of the (already pruned) build output
    /// * `archive_path` - Full path of the `<version>.zip` to create
    pub fn create(build_dir: &Path, archive_path: &Path) -> Result<ArchiveSummary, PublishError> {
        let archive_error = |message: String| PublishError::ArchiveFailed {
            path: archive_path.to_path_buf(),
            message,
        };

        let file = File::create(archive_path).map_err(|e| archive_error(e.to_string()))?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut files = 0usize;

        for entry in WalkDir::new(build_dir) {
            let entry = entry.map_err(|e| archive_error(e.to_string()))?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(build_dir)
                .map_err(|e| archive_error(e.to_string()))?;
            let entry_name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            zip.start_file(entry_name, options)
                .map_err(|e| archive_error(e.to_string()))?;

            let mut source = File::open(path).map_err(|e| archive_error(e.to_string()))?;
            io::copy(&mut source, &mut zip).map_err(|e| archive_error(e.to_string()))?;

            files += 1;
        }

        zip.finish().map_err(|e| archive_error(e.to_string()))?;

        let bytes = std::fs::metadata(archive_path)
            .map_err(|e| archive_error(e.to_string()))?
            .len();

        Ok(ArchiveSummary {
            archive_path: archive_path.to_path_buf(),
            files,
            bytes,
        })
    }
}
