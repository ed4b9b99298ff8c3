//! Builds a [`DatasetSummary`] from a [`DataTable`].
//!
//! Pure function of the table: no side effects, no mutation. The output is
//! what the plan provider sees, so every field here is part of the provider
//! contract.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::DataTable;
use crate::stats;

use super::types::{ColumnType, DatasetSummary, NumericSummary};

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(),  // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(),  // US date
        Regex::new(r"^\d{2}-\d{2}-\d{4}").unwrap(),  // European date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(),  // Alt ISO
    ]
});

/// Computes the descriptive snapshot a plan provider decides from.
pub struct SummaryBuilder {
    /// How many top values to report per categorical column.
    top_values_limit: usize,
    /// Outlier detection multiplier for the IQR rule.
    iqr_multiplier: f64,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self {
            top_values_limit: 10,
            iqr_multiplier: 1.5,
        }
    }

    /// Build the full summary for a table.
    pub fn build(&self, table: &DataTable) -> DatasetSummary {
        let mut dtypes = IndexMap::new();
        let mut missing_percent = IndexMap::new();
        let mut unique_counts = IndexMap::new();
        let mut top_values = IndexMap::new();
        let mut numeric_describe = IndexMap::new();
        let mut outliers = IndexMap::new();
        let mut constant_columns = Vec::new();
        let mut categorical_cardinality = IndexMap::new();

        let row_count = table.row_count();
        let mut numeric_columns: Vec<(String, usize)> = Vec::new();

        for (idx, name) in table.headers.iter().enumerate() {
            let values: Vec<&str> = table.column_values(idx).collect();
            let non_null: Vec<&str> = values
                .iter()
                .copied()
                .filter(|v| !DataTable::is_null_value(v))
                .collect();

            let dtype = infer_column_type(&non_null);
            dtypes.insert(name.clone(), dtype.label().to_string());

            let missing = if row_count == 0 {
                0.0
            } else {
                (row_count - non_null.len()) as f64 / row_count as f64 * 100.0
            };
            missing_percent.insert(name.clone(), missing);

            let counts = value_counts(&non_null);
            unique_counts.insert(name.clone(), counts.len());
            if counts.len() == 1 {
                constant_columns.push(name.clone());
            }

            if dtype.is_categorical() {
                categorical_cardinality.insert(name.clone(), counts.len());
                top_values.insert(name.clone(), top_n(&counts, self.top_values_limit));
            }

            if dtype.is_numeric() {
                let nums: Vec<f64> = non_null
                    .iter()
                    .filter_map(|v| v.trim().parse::<f64>().ok())
                    .collect();
                if !nums.is_empty() {
                    let describe = self.describe(&nums);
                    let (lo, hi) = describe.outlier_bounds();
                    let outlier_count = nums.iter().filter(|&&v| v < lo || v > hi).count();
                    numeric_describe.insert(name.clone(), describe);
                    outliers.insert(name.clone(), outlier_count);
                    numeric_columns.push((name.clone(), idx));
                }
            }
        }

        let correlation = self.correlation_matrix(table, &numeric_columns);

        DatasetSummary {
            shape: (row_count, table.column_count()),
            dtypes,
            missing_percent,
            duplicate_rows: duplicate_row_count(table),
            unique_counts,
            top_values,
            numeric_describe,
            outliers,
            correlation,
            constant_columns,
            categorical_cardinality,
            memory_usage_mb: estimate_memory_mb(table),
        }
    }

    fn describe(&self, nums: &[f64]) -> NumericSummary {
        NumericSummary {
            count: nums.len(),
            mean: stats::mean(nums),
            std: stats::std(nums, 1),
            min: nums.iter().copied().fold(f64::INFINITY, f64::min),
            q1: stats::quantile(nums, 0.25),
            median: stats::median(nums),
            q3: stats::quantile(nums, 0.75),
            max: nums.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Pearson correlation over pairwise-complete observations.
    fn correlation_matrix(
        &self,
        table: &DataTable,
        numeric_columns: &[(String, usize)],
    ) -> IndexMap<String, IndexMap<String, f64>> {
        let mut matrix = IndexMap::new();

        // Parse each numeric column once; None marks a missing cell.
        let parsed: Vec<Vec<Option<f64>>> = numeric_columns
            .iter()
            .map(|(_, idx)| {
                table
                    .column_values(*idx)
                    .map(|v| {
                        if DataTable::is_null_value(v) {
                            None
                        } else {
                            v.trim().parse::<f64>().ok()
                        }
                    })
                    .collect()
            })
            .collect();

        for (i, (name_i, _)) in numeric_columns.iter().enumerate() {
            let mut row = IndexMap::new();
            for (j, (name_j, _)) in numeric_columns.iter().enumerate() {
                let r = if i == j {
                    1.0
                } else {
                    let mut xs = Vec::new();
                    let mut ys = Vec::new();
                    for (a, b) in parsed[i].iter().zip(parsed[j].iter()) {
                        if let (Some(a), Some(b)) = (a, b) {
                            xs.push(*a);
                            ys.push(*b);
                        }
                    }
                    stats::pearson(&xs, &ys)
                };
                row.insert(name_j.clone(), r);
            }
            matrix.insert(name_i.clone(), row);
        }

        matrix
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency counts in first-encountered order.
fn value_counts(values: &[&str]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for v in values {
        *counts.entry((*v).to_string()).or_insert(0) += 1;
    }
    counts
}

/// The `limit` most frequent values, ties broken by first encounter.
fn top_n(counts: &IndexMap<String, usize>, limit: usize) -> IndexMap<String, usize> {
    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .take(limit)
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}

/// Rows equal to an earlier row.
fn duplicate_row_count(table: &DataTable) -> usize {
    let mut seen: HashSet<&[String]> = HashSet::new();
    let mut duplicates = 0;
    for row in &table.rows {
        if !seen.insert(row.as_slice()) {
            duplicates += 1;
        }
    }
    duplicates
}

/// Rough deep-size estimate: cell bytes plus per-string bookkeeping.
fn estimate_memory_mb(table: &DataTable) -> f64 {
    let string_overhead = std::mem::size_of::<String>();
    let mut bytes = 0usize;
    for h in &table.headers {
        bytes += h.len() + string_overhead;
    }
    for row in &table.rows {
        for cell in row {
            bytes += cell.len() + string_overhead;
        }
    }
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}

/// Infer a column's type by majority vote over its non-missing values.
fn infer_column_type(non_null: &[&str]) -> ColumnType {
    if non_null.is_empty() {
        return ColumnType::Unknown;
    }

    let mut int_count = 0;
    let mut float_count = 0;
    let mut bool_count = 0;
    let mut date_count = 0;
    let mut datetime_count = 0;
    let mut string_count = 0;

    for v in non_null {
        match detect_value_type(v) {
            ColumnType::Integer => int_count += 1,
            ColumnType::Float => float_count += 1,
            ColumnType::Boolean => bool_count += 1,
            ColumnType::Date => date_count += 1,
            ColumnType::DateTime => datetime_count += 1,
            _ => string_count += 1,
        }
    }

    let n = non_null.len();
    // Any plain string demotes the column to string; mixed int/float is float.
    if string_count > 0 {
        return ColumnType::String;
    }
    if bool_count == n {
        return ColumnType::Boolean;
    }
    if date_count + datetime_count == n {
        return if datetime_count > 0 {
            ColumnType::DateTime
        } else {
            ColumnType::Date
        };
    }
    if int_count + float_count == n {
        return if float_count > 0 {
            ColumnType::Float
        } else {
            ColumnType::Integer
        };
    }
    ColumnType::String
}

/// Detect the type of a single value.
fn detect_value_type(value: &str) -> ColumnType {
    let trimmed = value.trim();

    if matches!(trimmed.to_lowercase().as_str(), "true" | "false") {
        return ColumnType::Boolean;
    }
    if trimmed.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }
    if trimmed.parse::<f64>().is_ok() {
        return ColumnType::Float;
    }
    if DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        if trimmed.contains(':') || trimmed.contains('T') {
            return ColumnType::DateTime;
        }
        return ColumnType::Date;
    }

    ColumnType::String
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            b',',
        )
    }

    #[test]
    fn test_dtype_inference() {
        let table = make_table(
            vec!["i", "f", "s", "b", "d"],
            vec![
                vec!["1", "1.5", "x", "true", "2024-01-01"],
                vec!["2", "2.0", "y", "false", "2024-01-02"],
            ],
        );
        let summary = SummaryBuilder::new().build(&table);
        assert_eq!(summary.dtypes["i"], "integer");
        assert_eq!(summary.dtypes["f"], "float");
        assert_eq!(summary.dtypes["s"], "string");
        assert_eq!(summary.dtypes["b"], "boolean");
        assert_eq!(summary.dtypes["d"], "date");
    }

    #[test]
    fn test_missing_percent() {
        let table = make_table(
            vec!["v"],
            vec![vec!["1"], vec!["NA"], vec![""], vec!["4"]],
        );
        let summary = SummaryBuilder::new().build(&table);
        assert!((summary.missing_percent["v"] - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicates_and_constants() {
        let table = make_table(
            vec!["a", "c"],
            vec![
                vec!["1", "k"],
                vec!["2", "k"],
                vec!["1", "k"],
                vec!["1", "k"],
            ],
        );
        let summary = SummaryBuilder::new().build(&table);
        assert_eq!(summary.duplicate_rows, 2);
        assert_eq!(summary.constant_columns, vec!["c"]);
    }

    #[test]
    fn test_top_values_and_cardinality() {
        let table = make_table(
            vec!["city"],
            vec![vec!["NY"], vec!["LA"], vec!["NY"], vec!["SF"], vec!["NY"]],
        );
        let summary = SummaryBuilder::new().build(&table);
        let top = &summary.top_values["city"];
        assert_eq!(top.get_index(0), Some((&"NY".to_string(), &3)));
        assert_eq!(summary.categorical_cardinality["city"], 3);
    }

    #[test]
    fn test_numeric_describe_and_outliers() {
        let table = make_table(
            vec!["age"],
            vec![
                vec!["10"],
                vec!["12"],
                vec!["11"],
                vec!["12"],
                vec!["13"],
                vec!["1000"],
            ],
        );
        let summary = SummaryBuilder::new().build(&table);
        let d = &summary.numeric_describe["age"];
        assert_eq!(d.count, 6);
        assert!((d.q1 - 11.25).abs() < 1e-12);
        assert!((d.q3 - 12.75).abs() < 1e-12);
        assert_eq!(summary.outliers["age"], 1);
    }

    #[test]
    fn test_correlation_sign() {
        let table = make_table(
            vec!["x", "y"],
            vec![
                vec!["1", "10"],
                vec!["2", "8"],
                vec!["3", "6"],
                vec!["4", "4"],
            ],
        );
        let summary = SummaryBuilder::new().build(&table);
        assert!((summary.correlation["x"]["x"] - 1.0).abs() < 1e-12);
        assert!((summary.correlation["x"]["y"] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape() {
        let table = make_table(vec!["a", "b"], vec![vec!["1", "2"]]);
        let summary = SummaryBuilder::new().build(&table);
        assert_eq!(summary.shape, (1, 2));
    }
}
