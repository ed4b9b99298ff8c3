//! Delimited-text parser with delimiter auto-detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{AlembicError, Result};

use super::source::{DataTable, SourceMetadata};

/// Delimiters tried during auto-detection.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
        }
    }
}

/// Parses delimited tabular data files into a [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table plus source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| AlembicError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| AlembicError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse raw bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let headers: Vec<String> = match records.next() {
            Some(first) => {
                let first = first?;
                if self.config.has_header {
                    first.iter().map(|s| s.trim().to_string()).collect()
                } else {
                    (0..first.len()).map(|i| format!("column_{}", i + 1)).collect()
                }
            }
            None => return Err(AlembicError::EmptyData("no rows found".to_string())),
        };

        if headers.is_empty() {
            return Err(AlembicError::EmptyData("no columns found".to_string()));
        }

        let width = headers.len();
        let mut rows: Vec<Vec<String>> = Vec::new();

        // When there is no header row, the first record is data too.
        if !self.config.has_header {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .has_headers(false)
                .flexible(true)
                .from_reader(bytes);
            for result in reader.records() {
                if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                    break;
                }
                rows.push(normalize_record(&result?, width));
            }
        } else {
            for result in records {
                if self.config.max_rows.is_some_and(|max| rows.len() >= max) {
                    break;
                }
                rows.push(normalize_record(&result?, width));
            }
        }

        if rows.is_empty() {
            return Err(AlembicError::EmptyData("no data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pad or truncate a record to the header width.
fn normalize_record(record: &csv::StringRecord, width: usize) -> Vec<String> {
    let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
    row.resize(width, String::new());
    row
}

/// Pick the delimiter whose per-line count is highest and most consistent
/// over the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    if lines.is_empty() {
        return Err(AlembicError::EmptyData("no lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_unquoted(line, delim as char))
            .collect();
        let first = counts[0];
        if first == 0 {
            continue;
        }
        let consistent = counts.iter().all(|&c| c == first);
        // Consistent counts dominate; tab wins ties since it rarely appears
        // inside values.
        let score = if consistent { first * 1000 } else { first }
            + if delim == b'\t' { 1 } else { 0 };
        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences outside double quotes.
fn count_unquoted(line: &str, delimiter: char) -> usize {
    let mut count = 0;
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}
