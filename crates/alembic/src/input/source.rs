//! The working dataset representation and source metadata.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }
}

/// Parsed tabular data: ordered headers plus row-major string cells.
///
/// Every preprocessing run works on its own owned copy; the engine takes a
/// `DataTable` by value and hands back the transformed version. The empty
/// string is the canonical missing marker, but several other spellings are
/// recognized on input (see [`DataTable::is_null_value`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used on input (and for export).
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of a column by index, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// A specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Overwrite a cell. Out-of-range indices are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Remove a column and every cell under it.
    pub fn drop_column(&mut self, index: usize) {
        if index >= self.headers.len() {
            return;
        }
        self.headers.remove(index);
        for row in &mut self.rows {
            if index < row.len() {
                row.remove(index);
            }
        }
    }

    /// Append a column at the end. `values` is padded with the missing
    /// marker if shorter than the current row count.
    pub fn push_column(&mut self, name: String, values: Vec<String>) {
        self.headers.push(name);
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().unwrap_or_default());
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(usize) -> bool) {
        let mut idx = 0;
        self.rows.retain(|_| {
            let keep_row = keep(idx);
            idx += 1;
            keep_row
        });
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }

    /// Rewrite boolean-valued columns (`true`/`false`) as `1`/`0`.
    ///
    /// Applied before export so downstream consumers see a numeric
    /// representation; one-hot indicator columns are already 0/1.
    pub fn normalize_boolean_columns(&mut self) {
        for col in 0..self.headers.len() {
            let mut any = false;
            let all_bool = self.rows.iter().all(|row| {
                let v = row.get(col).map(|s| s.as_str()).unwrap_or("");
                if Self::is_null_value(v) {
                    return true;
                }
                any = true;
                v.trim().eq_ignore_ascii_case("true") || v.trim().eq_ignore_ascii_case("false")
            });
            if !all_bool || !any {
                continue;
            }
            for row in &mut self.rows {
                if let Some(cell) = row.get_mut(col) {
                    if cell.trim().eq_ignore_ascii_case("true") {
                        *cell = "1".to_string();
                    } else if cell.trim().eq_ignore_ascii_case("false") {
                        *cell = "0".to_string();
                    }
                }
            }
        }
    }

    /// Write the table as delimited text with a header row.
    pub fn write_delimited<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Render the table as a delimited string (mainly for tests and small
    /// outputs).
    pub fn to_delimited_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_delimited(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataTable {
        DataTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec!["1".to_string(), "x".to_string()],
                vec!["2".to_string(), "y".to_string()],
                vec!["3".to_string(), "z".to_string()],
            ],
            b',',
        )
    }

    #[test]
    fn test_drop_column() {
        let mut t = table();
        t.drop_column(0);
        assert_eq!(t.headers, vec!["b"]);
        assert_eq!(t.rows[0], vec!["x"]);
    }

    #[test]
    fn test_push_column_pads_short_input() {
        let mut t = table();
        t.push_column("c".to_string(), vec!["only".to_string()]);
        assert_eq!(t.get(0, 2), Some("only"));
        assert_eq!(t.get(2, 2), Some(""));
    }

    #[test]
    fn test_retain_rows() {
        let mut t = table();
        t.retain_rows(|i| i != 1);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.get(1, 0), Some("3"));
    }

    #[test]
    fn test_normalize_boolean_columns() {
        let mut t = DataTable::new(
            vec!["flag".to_string(), "name".to_string()],
            vec![
                vec!["true".to_string(), "true".to_string()],
                vec!["false".to_string(), "maybe".to_string()],
                vec!["".to_string(), "false".to_string()],
            ],
            b',',
        );
        t.normalize_boolean_columns();
        assert_eq!(t.get(0, 0), Some("1"));
        assert_eq!(t.get(1, 0), Some("0"));
        assert_eq!(t.get(2, 0), Some(""));
        // Mixed column untouched
        assert_eq!(t.get(0, 1), Some("true"));
    }

    #[test]
    fn test_write_delimited_roundtrip() {
        let t = table();
        let text = t.to_delimited_string().unwrap();
        assert_eq!(text, "a,b\n1,x\n2,y\n3,z\n");
    }
}
