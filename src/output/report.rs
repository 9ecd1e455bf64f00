//! Result classification and report writing
//!
//! Every check result becomes one row of the main report; results with
//! status 404 are additionally written to the 404 report. Rows are
//! append-only and never deduplicated.

use crate::checker::CheckResult;
use crate::output::create_output_file;
use crate::RippleError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names shared by the main and 404 reports
pub const REPORT_HEADER: [&str; 5] = [
    "URL",
    "Status Code",
    "Content-Type",
    "Parent URL",
    "Input Line Number",
];

/// Writer for the main report and the 404 report
pub struct ReportWriter<W: Write> {
    main: csv::Writer<W>,
    not_found: csv::Writer<W>,
    main_rows: usize,
    not_found_rows: usize,
}

impl ReportWriter<File> {
    /// Creates both report files (and their directories) with header rows
    pub fn create(main_path: &Path, not_found_path: &Path) -> Result<Self, RippleError> {
        let main = create_output_file(main_path)?;
        let not_found = create_output_file(not_found_path)?;
        Self::from_writers(main, not_found)
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn from_writers(main: W, not_found: W) -> Result<Self, RippleError> {
        let mut main = csv::Writer::from_writer(main);
        let mut not_found = csv::Writer::from_writer(not_found);
        main.write_record(REPORT_HEADER)?;
        not_found.write_record(REPORT_HEADER)?;
        Ok(Self {
            main,
            not_found,
            main_rows: 0,
            not_found_rows: 0,
        })
    }

    /// Appends a result to the main report, and to the 404 report if its
    /// status is 404
    ///
    /// Returns true if the row also went to the 404 report.
    pub fn append(&mut self, result: &CheckResult) -> Result<bool, RippleError> {
        let row = report_row(result);

        self.main.write_record(&row)?;
        self.main_rows += 1;

        if result.is_not_found() {
            self.not_found.write_record(&row)?;
            self.not_found_rows += 1;
            return Ok(true);
        }

        Ok(false)
    }

    pub fn flush(&mut self) -> Result<(), RippleError> {
        self.main.flush()?;
        self.not_found.flush()?;
        Ok(())
    }

    pub fn main_rows(&self) -> usize {
        self.main_rows
    }

    pub fn not_found_rows(&self) -> usize {
        self.not_found_rows
    }

    /// Flushes and returns the underlying (main, 404) writers
    pub fn into_inner(self) -> Result<(W, W), RippleError> {
        let main = self
            .main
            .into_inner()
            .map_err(|e| RippleError::Io(e.into_error()))?;
        let not_found = self
            .not_found
            .into_inner()
            .map_err(|e| RippleError::Io(e.into_error()))?;
        Ok((main, not_found))
    }
}

/// Formats a result in report column order
fn report_row(result: &CheckResult) -> [String; 5] {
    [
        result.url.to_string(),
        result
            .status_code()
            .map(|code| code.to_string())
            .unwrap_or_default(),
        result.content_type().to_string(),
        result.parent_url.clone(),
        result.line_number.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{CheckInput, CheckOutcome, ErrorKind};
    use url::Url;

    fn result(path: &str, line: u64, outcome: CheckOutcome) -> CheckResult {
        let input = CheckInput {
            url: Url::parse(&format!("https://x.org{}", path)).unwrap(),
            parent_url: "https://x.org/".to_string(),
            line_number: line,
        };
        CheckResult::new(input, outcome, 1)
    }

    fn finish(writer: ReportWriter<Vec<u8>>) -> (String, String) {
        let (main, not_found) = writer.into_inner().unwrap();
        (
            String::from_utf8(main).unwrap(),
            String::from_utf8(not_found).unwrap(),
        )
    }

    #[test]
    fn test_headers_written() {
        let writer = ReportWriter::from_writers(Vec::new(), Vec::new()).unwrap();
        let (main, not_found) = finish(writer);
        let header = "URL,Status Code,Content-Type,Parent URL,Input Line Number\n";
        assert_eq!(main, header);
        assert_eq!(not_found, header);
    }

    #[test]
    fn test_404_goes_to_both_reports() {
        let mut writer = ReportWriter::from_writers(Vec::new(), Vec::new()).unwrap();

        assert!(!writer
            .append(&result("/ok", 2, CheckOutcome::status(200, "text/html")))
            .unwrap());
        assert!(writer
            .append(&result("/gone", 3, CheckOutcome::status(404, "text/html")))
            .unwrap());
        assert!(!writer
            .append(&result("/down", 4, CheckOutcome::Error(ErrorKind::Timeout)))
            .unwrap());

        assert_eq!(writer.main_rows(), 3);
        assert_eq!(writer.not_found_rows(), 1);

        let (main, not_found) = finish(writer);
        let main_lines: Vec<&str> = main.lines().collect();
        assert_eq!(main_lines[1], "https://x.org/ok,200,text/html,https://x.org/,2");
        assert_eq!(main_lines[2], "https://x.org/gone,404,text/html,https://x.org/,3");
        assert_eq!(main_lines[3], "https://x.org/down,,,https://x.org/,4");

        let not_found_lines: Vec<&str> = not_found.lines().collect();
        assert_eq!(not_found_lines.len(), 2);
        assert_eq!(not_found_lines[1], main_lines[2]);
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let mut writer = ReportWriter::from_writers(Vec::new(), Vec::new()).unwrap();
        writer
            .append(&result("/same", 2, CheckOutcome::status(404, "")))
            .unwrap();
        writer
            .append(&result("/same", 5, CheckOutcome::status(404, "")))
            .unwrap();

        assert_eq!(writer.main_rows(), 2);
        assert_eq!(writer.not_found_rows(), 2);
    }

    #[test]
    fn test_create_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let main_path = dir.path().join("r/main.csv");
        let nf_path = dir.path().join("r/404.csv");

        let mut writer = ReportWriter::create(&main_path, &nf_path).unwrap();
        writer
            .append(&result("/gone", 2, CheckOutcome::status(404, "")))
            .unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&main_path).unwrap().lines().count(), 2);
        assert_eq!(std::fs::read_to_string(&nf_path).unwrap().lines().count(), 2);
    }
}
