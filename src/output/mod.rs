//! Output module for crawl and validation results
//!
//! This module handles:
//! - Writing the crawler's link CSV (`URL, Parent URL`)
//! - Writing the validator's main and 404 reports
//! - Collecting and logging run statistics

mod links;
mod report;
pub mod stats;

pub use links::{LinkCsvWriter, LINK_CSV_HEADER};
pub use report::{ReportWriter, REPORT_HEADER};
pub use stats::{CheckStatistics, CrawlStatistics};

use chrono::NaiveDate;
use std::fs::File;
use std::io;
use std::path::Path;

/// Builds an output file name of the form `<prefix>-<YYYY-MM-DD>.csv`
///
/// ```
/// use chrono::NaiveDate;
/// use link_ripple::output::dated_filename;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(dated_filename("get-links", date), "get-links-2024-01-05.csv");
/// ```
pub fn dated_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// Creates (truncating) a file, creating its parent directory first
pub(crate) fn create_output_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}
