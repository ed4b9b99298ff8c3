//! Summary type definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Inferred data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text/string values.
    String,
    /// Boolean values (true/false).
    Boolean,
    /// Date values.
    Date,
    /// Date and time values.
    DateTime,
    /// Unable to determine type.
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if values of this type are treated as categories
    /// (value counts, cardinality) by the summary.
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Date | ColumnType::DateTime
        )
    }

    /// Dtype label used in the serialized summary.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Unknown => "unknown",
        }
    }
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    pub min: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    pub median: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// IQR outlier bounds with the standard 1.5 multiplier.
    pub fn outlier_bounds(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - 1.5 * iqr, self.q3 + 1.5 * iqr)
    }
}

/// Descriptive snapshot of a dataset, serialized for the plan provider.
///
/// Field names follow the wire schema the provider prompt documents; maps
/// preserve column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// (row count, column count).
    pub shape: (usize, usize),
    /// Per-column dtype label.
    pub dtypes: IndexMap<String, String>,
    /// Per-column missing percentage (0-100).
    pub missing_percent: IndexMap<String, f64>,
    /// Number of rows that duplicate an earlier row.
    pub duplicate_rows: usize,
    /// Per-column count of unique non-missing values.
    pub unique_counts: IndexMap<String, usize>,
    /// Top-10 value frequencies per categorical column.
    pub top_values: IndexMap<String, IndexMap<String, usize>>,
    /// Descriptive statistics per numeric column.
    pub numeric_describe: IndexMap<String, NumericSummary>,
    /// Per-numeric-column IQR outlier count.
    pub outliers: IndexMap<String, usize>,
    /// Pearson correlation matrix over numeric columns.
    pub correlation: IndexMap<String, IndexMap<String, f64>>,
    /// Columns with a single unique value.
    pub constant_columns: Vec<String>,
    /// Per-categorical-column cardinality.
    pub categorical_cardinality: IndexMap<String, usize>,
    /// Estimated in-memory size in megabytes.
    pub memory_usage_mb: f64,
}
