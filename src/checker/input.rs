//! Link CSV reader for the validator
//!
//! The input needs a `URL` column and may have a `Parent URL` column; other
//! columns are ignored. Rows are validated as they are read and any
//! malformed row is a setup error, never silently coerced.

use crate::checker::CheckInput;
use crate::RippleError;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use url::Url;

const URL_COLUMN: &str = "URL";
const PARENT_COLUMN: &str = "Parent URL";

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct InputSchema {
    url: usize,
    parent: Option<usize>,
}

impl InputSchema {
    fn from_headers(headers: &StringRecord) -> Result<Self, RippleError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };

        let url = find(URL_COLUMN).ok_or_else(|| RippleError::MissingColumn(URL_COLUMN.to_string()))?;
        let parent = find(PARENT_COLUMN);
        Ok(Self { url, parent })
    }
}

/// Batched reader over a link CSV
pub struct LinkCsvReader<R: Read> {
    reader: csv::Reader<R>,
    schema: InputSchema,
    record: StringRecord,
}

impl LinkCsvReader<File> {
    pub fn open(path: &Path) -> Result<Self, RippleError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read> LinkCsvReader<R> {
    pub fn from_reader(inner: R) -> Result<Self, RippleError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(inner);
        let schema = InputSchema::from_headers(reader.headers()?)?;
        Ok(Self {
            reader,
            schema,
            record: StringRecord::new(),
        })
    }

    /// Reads up to `size` rows; an empty batch means the input is exhausted
    pub fn next_batch(&mut self, size: usize) -> Result<Vec<CheckInput>, RippleError> {
        let mut batch = Vec::with_capacity(size);

        while batch.len() < size && self.reader.read_record(&mut self.record)? {
            batch.push(parse_row(&self.record, self.schema)?);
        }

        Ok(batch)
    }
}

/// Validates every row of a link CSV and returns the number of rows
///
/// Run before any checking starts so a malformed file aborts the run before
/// partial reports are produced.
pub fn scan_links_file(path: &Path) -> Result<u64, RippleError> {
    let mut reader = LinkCsvReader::open(path)?;
    let mut rows = 0u64;
    loop {
        let batch = reader.next_batch(1024)?;
        if batch.is_empty() {
            return Ok(rows);
        }
        rows += batch.len() as u64;
    }
}

fn parse_row(record: &StringRecord, schema: InputSchema) -> Result<CheckInput, RippleError> {
    let line_number = record.position().map_or(0, |p| p.line());

    let raw_url = record.get(schema.url).map(str::trim).unwrap_or("");
    if raw_url.is_empty() {
        return Err(RippleError::MalformedInput {
            line: line_number,
            message: "empty URL".to_string(),
        });
    }

    let url = Url::parse(raw_url).map_err(|e| RippleError::MalformedInput {
        line: line_number,
        message: format!("invalid URL '{}': {}", raw_url, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(RippleError::MalformedInput {
            line: line_number,
            message: format!("unsupported scheme in '{}'", raw_url),
        });
    }

    let parent_url = schema
        .parent
        .and_then(|idx| record.get(idx))
        .map(|p| p.trim().to_string())
        .unwrap_or_default();

    Ok(CheckInput {
        url,
        parent_url,
        line_number,
    })
}
