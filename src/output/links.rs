use crate::crawler::LinkRecord;
use crate::output::create_output_file;
use crate::RippleError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names of the crawler's link CSV
pub const LINK_CSV_HEADER: [&str; 2] = ["URL", "Parent URL"];

/// Incremental writer for the crawler's link CSV
///
/// Rows are written as records are accepted. Call `flush` at level
/// boundaries so everything discovered so far survives an interrupted run.
pub struct LinkCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl LinkCsvWriter<File> {
    /// Creates the CSV file (and its directory) and writes the header row
    pub fn create(path: &Path) -> Result<Self, RippleError> {
        let file = create_output_file(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> LinkCsvWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self, RippleError> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(LINK_CSV_HEADER)?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Appends one accepted link record
    pub fn write(&mut self, record: &LinkRecord) -> Result<(), RippleError> {
        self.writer
            .write_record([record.url.as_str(), record.parent_str()])?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RippleError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> Result<W, RippleError> {
        self.writer
            .into_inner()
            .map_err(|e| RippleError::Io(e.into_error()))
    }
}
