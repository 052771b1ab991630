//! Raw XML results extraction
//!
//! Reads the coverage percentage straight off the summary element of the
//! raw results file with a fixed regular expression, bypassing the HTML
//! rendering step entirely.

use super::{read_report, CoverageError};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// Fixed lookup: the sequence-coverage attribute of the results summary
const COVERAGE_ATTRIBUTE: &str = r#"sequenceCoverage="([0-9]+(?:\.[0-9]+)?)""#;

lazy_static! {
    static ref COVERAGE_PATTERN: Regex =
        Regex::new(COVERAGE_ATTRIBUTE).expect("coverage pattern is valid");
}

/// Extractor for the raw XML results file (`results.xml`)
pub struct XmlCoverageReport;

impl XmlCoverageReport {
    /// Pull the coverage percentage out of the results file
    pub async fn extract(path: &Path) -> Result<String, CoverageError> {
        let content = read_report(path).await?;

        COVERAGE_PATTERN
            .captures(&content)
            .map(|caps| format!("{}%", &caps[1]))
            .ok_or_else(|| CoverageError::FieldNotFound {
                path: path.to_path_buf(),
                lookup: COVERAGE_ATTRIBUTE.to_string(),
            })
    }
}
