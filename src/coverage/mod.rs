//! Coverage report field extraction
//!
//! Peer utility for the CI pipeline: pulls the single line-coverage
//! percentage out of a generated coverage report and nothing else. Two
//! report shapes are supported, each read at a fixed structural position:
//! the rendered HTML summary and the raw XML results file. If the position
//! no longer matches, the extraction fails loudly so the fixed lookup gets
//! updated rather than silently reporting nothing.

pub mod html_report;
pub mod xml_report;

pub use html_report::HtmlCoverageReport;
pub use xml_report::XmlCoverageReport;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from coverage extraction
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("カバレッジレポートが見つかりません: {}", .path.display())]
    ReportNotFound { path: PathBuf },

    #[error("カバレッジレポートの読み取りに失敗しました: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error(
        "カバレッジ値が見つかりません（固定ルックアップ '{lookup}' がレポートの構造と一致しません）: {}",
        .path.display()
    )]
    FieldNotFound { path: PathBuf, lookup: String },

    #[error("不明なレポート形式です: {}", .path.display())]
    UnknownFormat { path: PathBuf },
}

/// Report shapes the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Xml,
}

impl ReportFormat {
    /// Infer the format from the file extension
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("html") | Some("htm") => Some(Self::Html),
            Some("xml") => Some(Self::Xml),
            _ => None,
        }
    }
}

/// Extract the coverage percentage from the report at `path`
///
/// # Arguments
///
/// * `path` - Report file (`Report/index.html` or `results.xml`)
/// * `format` - Explicit format, or `None` to detect from the extension
pub async fn extract(path: &Path, format: Option<ReportFormat>) -> Result<String, CoverageError> {
    let format = match format.or_else(|| ReportFormat::detect(path)) {
        Some(format) => format,
        None => {
            return Err(CoverageError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
    };

    match format {
        ReportFormat::Html => HtmlCoverageReport::extract(path).await,
        ReportFormat::Xml => XmlCoverageReport::extract(path).await,
    }
}

pub(crate) async fn read_report(path: &Path) -> Result<String, CoverageError> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoverageError::ReportNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CoverageError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })
}
