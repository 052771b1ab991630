//! HTML coverage summary extraction
//!
//! The report generator renders its summary as an overview table whose fifth
//! row holds the line-coverage cell. That position is encoded in one fixed
//! CSS selector; when the generator changes its layout, `COVERAGE_SELECTOR`
//! is the single place to update.

use super::{read_report, CoverageError};
use scraper::{Html, Selector};
use std::path::Path;

/// Fixed lookup position of the line-coverage cell in the rendered summary
const COVERAGE_SELECTOR: &str = "div.container table.overview tr:nth-child(5) td";

/// Extractor for the rendered HTML summary (`Report/index.html`)
pub struct HtmlCoverageReport;

impl HtmlCoverageReport {
    /// Pull the line-coverage cell text out of the report
    pub async fn extract(path: &Path) -> Result<String, CoverageError> {
        let content = read_report(path).await?;
        let document = Html::parse_document(&content);

        let selector =
            Selector::parse(COVERAGE_SELECTOR).map_err(|e| CoverageError::FieldNotFound {
                path: path.to_path_buf(),
                lookup: format!("{} ({})", COVERAGE_SELECTOR, e),
            })?;

        document
            .select(&selector)
            .next()
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CoverageError::FieldNotFound {
                path: path.to_path_buf(),
                lookup: COVERAGE_SELECTOR.to_string(),
            })
    }
}
