//! Column-level operations the engine dispatches to.
//!
//! Every function here works on the column's *current* values: statistics
//! are recomputed after whatever earlier actions in the sequence did, not
//! cached from the original dataset. Functions return `true` when they ran
//! and `false` when an eligibility guard turned them into a no-op.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::input::DataTable;
use crate::stats;

/// Category label for encoding: missing cells become the `NA` category.
fn category_label(value: &str) -> String {
    if DataTable::is_null_value(value) {
        "NA".to_string()
    } else {
        value.to_string()
    }
}

/// Render a number the way table cells store them.
fn format_value(value: f64) -> String {
    format!("{}", value)
}

/// A column is numeric when it has at least one non-missing value and
/// every non-missing value parses as a float.
pub(crate) fn is_numeric_column(table: &DataTable, col: usize) -> bool {
    let mut any = false;
    for v in table.column_values(col) {
        if DataTable::is_null_value(v) {
            continue;
        }
        if v.trim().parse::<f64>().is_err() {
            return false;
        }
        any = true;
    }
    any
}

/// All non-missing values of a column parsed as floats.
fn numeric_values(table: &DataTable, col: usize) -> Vec<f64> {
    table
        .column_values(col)
        .filter(|v| !DataTable::is_null_value(v))
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect()
}

/// Overwrite every missing cell of a column with `value`.
fn fill_missing(table: &mut DataTable, col: usize, value: &str) {
    for row in 0..table.row_count() {
        let current = table.get(row, col).unwrap_or("");
        if DataTable::is_null_value(current) {
            table.set(row, col, value.to_string());
        }
    }
}

/// Fill missing entries with the column median or mean. Numeric only.
pub(crate) fn fill_center(table: &mut DataTable, col: usize, use_median: bool) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    let nums = numeric_values(table, col);
    let center = if use_median {
        stats::median(&nums)
    } else {
        stats::mean(&nums)
    };
    fill_missing(table, col, &format_value(center));
    true
}

/// Fill missing entries with the most frequent value; ties go to the value
/// encountered first. Any column type.
pub(crate) fn fill_mode(table: &mut DataTable, col: usize) -> bool {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for v in table.column_values(col) {
        if !DataTable::is_null_value(v) {
            *counts.entry(v.to_string()).or_insert(0) += 1;
        }
    }

    let mut mode: Option<(String, usize)> = None;
    for (value, count) in &counts {
        if mode.as_ref().is_none_or(|(_, best)| *count > *best) {
            mode = Some((value.clone(), *count));
        }
    }

    match mode {
        Some((value, _)) => {
            fill_missing(table, col, &value);
            true
        }
        None => false,
    }
}

/// Fill missing entries with the literal `"Unknown"`. Any column type,
/// numeric included.
pub(crate) fn fill_unknown(table: &mut DataTable, col: usize) -> bool {
    fill_missing(table, col, "Unknown");
    true
}

/// Explode a column into one 0/1 indicator column per distinct observed
/// category (missing cells form an `NA` category). The original column is
/// removed and indicators are appended in sorted category order.
pub(crate) fn one_hot(table: &mut DataTable, col: usize) {
    let name = table.headers[col].clone();
    let labels: Vec<String> = table.column_values(col).map(category_label).collect();
    let categories: BTreeSet<String> = labels.iter().cloned().collect();

    table.drop_column(col);
    for category in categories {
        let cells: Vec<String> = labels
            .iter()
            .map(|l| if *l == category { "1" } else { "0" }.to_string())
            .collect();
        table.push_column(format!("{}_{}", name, category), cells);
    }
}

/// Map each distinct value (coerced to text, missing as `NA`) to an integer
/// code assigned over a stable sort of the distinct values. Codes are only
/// deterministic for a given run's category set.
pub(crate) fn label_encode(table: &mut DataTable, col: usize) -> bool {
    let labels: Vec<String> = table.column_values(col).map(category_label).collect();
    if labels.is_empty() {
        return false;
    }
    let categories: BTreeSet<String> = labels.iter().cloned().collect();
    let codes: IndexMap<&String, usize> = categories
        .iter()
        .enumerate()
        .map(|(code, cat)| (cat, code))
        .collect();

    for (row, label) in labels.iter().enumerate() {
        if let Some(code) = codes.get(label) {
            table.set(row, col, code.to_string());
        }
    }
    true
}

/// Rewrite every value as (x - mean) / std with parameters from the
/// current values. Zero variance maps everything to 0. Numeric only;
/// missing cells stay missing.
pub(crate) fn scale_standard(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    let nums = numeric_values(table, col);
    let mean = stats::mean(&nums);
    let std = stats::std(&nums, 0);

    rewrite_numeric(table, col, |v| {
        if std == 0.0 { 0.0 } else { (v - mean) / std }
    });
    true
}

/// Rewrite every value as (x - min) / (max - min). Zero range maps
/// everything to 0. Numeric only; missing cells stay missing.
pub(crate) fn scale_minmax(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    let nums = numeric_values(table, col);
    let min = nums.iter().copied().fold(f64::INFINITY, f64::min);
    let max = nums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    rewrite_numeric(table, col, |v| {
        if range == 0.0 { 0.0 } else { (v - min) / range }
    });
    true
}

/// Remove whole rows whose value in this column is missing or outside the
/// IQR bounds. Numeric only. Later actions on any column see the filtered
/// row set.
pub(crate) fn drop_outliers(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    let nums = numeric_values(table, col);
    let (lo, hi) = stats::iqr_bounds(&nums, 1.5);

    let keep: Vec<bool> = table
        .column_values(col)
        .map(|v| {
            if DataTable::is_null_value(v) {
                return false;
            }
            match v.trim().parse::<f64>() {
                Ok(n) => n >= lo && n <= hi,
                Err(_) => false,
            }
        })
        .collect();

    table.retain_rows(|row| keep[row]);
    true
}

/// Clip out-of-bound values to the nearest IQR bound. Numeric only;
/// missing cells untouched.
pub(crate) fn cap_outliers(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    let nums = numeric_values(table, col);
    let (lo, hi) = stats::iqr_bounds(&nums, 1.5);

    rewrite_numeric(table, col, |v| v.clamp(lo, hi));
    true
}

/// log(1+x); inputs at or below -1 become the missing marker.
pub(crate) fn log_transform(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    rewrite_numeric_fallible(table, col, |v| {
        if v <= -1.0 { None } else { Some(v.ln_1p()) }
    });
    true
}

/// Square root; negative inputs become the missing marker.
pub(crate) fn sqrt_transform(table: &mut DataTable, col: usize) -> bool {
    if !is_numeric_column(table, col) {
        return false;
    }
    rewrite_numeric_fallible(table, col, |v| {
        if v < 0.0 { None } else { Some(v.sqrt()) }
    });
    true
}

/// Apply `f` to every non-missing value of a column, in place.
fn rewrite_numeric(table: &mut DataTable, col: usize, f: impl Fn(f64) -> f64) {
    rewrite_numeric_fallible(table, col, |v| Some(f(v)));
}

/// Like [`rewrite_numeric`], but `None` writes the missing marker.
fn rewrite_numeric_fallible(
    table: &mut DataTable,
    col: usize,
    f: impl Fn(f64) -> Option<f64>,
) {
    for row in 0..table.row_count() {
        let current = table.get(row, col).unwrap_or("");
        if DataTable::is_null_value(current) {
            continue;
        }
        if let Ok(v) = current.trim().parse::<f64>() {
            match f(v) {
                Some(out) => table.set(row, col, format_value(out)),
                None => table.set(row, col, String::new()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_table(values: Vec<&str>) -> DataTable {
        DataTable::new(
            vec!["v".to_string()],
            values
                .into_iter()
                .map(|v| vec![v.to_string()])
                .collect(),
            b',',
        )
    }

    fn cells(table: &DataTable, col: usize) -> Vec<String> {
        table.column_values(col).map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_guard() {
        assert!(is_numeric_column(&column_table(vec!["1", "2.5", "NA"]), 0));
        assert!(!is_numeric_column(&column_table(vec!["1", "x"]), 0));
        // All-missing column is not numeric.
        assert!(!is_numeric_column(&column_table(vec!["", "NA"]), 0));
    }

    #[test]
    fn test_fill_median_uses_current_values() {
        let mut t = column_table(vec!["10", "12", "11", "13", "1000", ""]);
        assert!(fill_center(&mut t, 0, true));
        assert_eq!(t.get(5, 0), Some("12"));
    }

    #[test]
    fn test_fill_mean() {
        let mut t = column_table(vec!["1", "2", "3", "NA"]);
        assert!(fill_center(&mut t, 0, false));
        assert_eq!(t.get(3, 0), Some("2"));
    }

    #[test]
    fn test_fill_center_guard_on_text() {
        let mut t = column_table(vec!["a", "b", ""]);
        assert!(!fill_center(&mut t, 0, true));
        assert_eq!(t.get(2, 0), Some(""));
    }

    #[test]
    fn test_fill_mode_first_encounter_tiebreak() {
        // "LA" and "NY" both appear twice; "NY" was seen first.
        let mut t = column_table(vec!["NY", "LA", "NY", "LA", ""]);
        assert!(fill_mode(&mut t, 0));
        assert_eq!(t.get(4, 0), Some("NY"));
    }

    #[test]
    fn test_fill_mode_all_missing_is_noop() {
        let mut t = column_table(vec!["", "NA"]);
        assert!(!fill_mode(&mut t, 0));
    }

    #[test]
    fn test_fill_unknown_applies_to_numeric_too() {
        let mut t = column_table(vec!["1", ""]);
        assert!(fill_unknown(&mut t, 0));
        assert_eq!(t.get(1, 0), Some("Unknown"));
    }

    #[test]
    fn test_one_hot_explodes_in_sorted_order() {
        let mut t = column_table(vec!["NY", "LA", "NY", "Unknown"]);
        one_hot(&mut t, 0);
        assert_eq!(t.headers, vec!["v_LA", "v_NY", "v_Unknown"]);
        assert_eq!(cells(&t, 0), vec!["0", "1", "0", "0"]);
        assert_eq!(cells(&t, 1), vec!["1", "0", "1", "0"]);
        assert_eq!(cells(&t, 2), vec!["0", "0", "0", "1"]);
    }

    #[test]
    fn test_one_hot_missing_becomes_na_category() {
        let mut t = column_table(vec!["a", "", "a"]);
        one_hot(&mut t, 0);
        assert_eq!(t.headers, vec!["v_NA", "v_a"]);
        assert_eq!(cells(&t, 0), vec!["0", "1", "0"]);
    }

    #[test]
    fn test_label_encode_sorted_codes() {
        let mut t = column_table(vec!["cherry", "apple", "banana", "apple"]);
        assert!(label_encode(&mut t, 0));
        assert_eq!(cells(&t, 0), vec!["2", "0", "1", "0"]);
    }

    #[test]
    fn test_label_encode_missing_is_na_category() {
        let mut t = column_table(vec!["b", "", "a"]);
        assert!(label_encode(&mut t, 0));
        // Sorted distinct: ["NA", "a", "b"]
        assert_eq!(cells(&t, 0), vec!["2", "0", "1"]);
    }

    #[test]
    fn test_scale_standard() {
        let mut t = column_table(vec!["2", "4", "6"]);
        assert!(scale_standard(&mut t, 0));
        let vals: Vec<f64> = cells(&t, 0).iter().map(|v| v.parse().unwrap()).collect();
        assert!((crate::stats::mean(&vals)).abs() < 1e-12);
        assert!((crate::stats::std(&vals, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_standard_constant_column() {
        let mut t = column_table(vec!["5", "5", "5"]);
        assert!(scale_standard(&mut t, 0));
        assert_eq!(cells(&t, 0), vec!["0", "0", "0"]);
    }

    #[test]
    fn test_scale_minmax() {
        let mut t = column_table(vec!["10", "20", "15", ""]);
        assert!(scale_minmax(&mut t, 0));
        assert_eq!(cells(&t, 0), vec!["0", "1", "0.5", ""]);
    }

    #[test]
    fn test_cap_outliers_exact_bound() {
        let mut t = column_table(vec!["10", "12", "11", "13", "1000", "12"]);
        assert!(cap_outliers(&mut t, 0));
        // Bounds over [10,11,12,12,13,1000]: [9.0, 15.0]
        assert_eq!(t.get(4, 0), Some("15"));
        assert_eq!(t.get(0, 0), Some("10"));
    }

    #[test]
    fn test_drop_outliers_filters_rows() {
        let mut t = DataTable::new(
            vec!["age".to_string(), "city".to_string()],
            vec![
                vec!["10".to_string(), "NY".to_string()],
                vec!["12".to_string(), "LA".to_string()],
                vec!["11".to_string(), "SF".to_string()],
                vec!["13".to_string(), "NY".to_string()],
                vec!["1000".to_string(), "LA".to_string()],
            ],
            b',',
        );
        assert!(drop_outliers(&mut t, 0));
        assert_eq!(t.row_count(), 4);
        // The whole row went, not just the cell.
        assert_eq!(cells(&t, 1), vec!["NY", "LA", "SF", "NY"]);
        assert!(!cells(&t, 0).contains(&"1000".to_string()));
    }

    #[test]
    fn test_drop_outliers_removes_missing_rows() {
        let mut t = column_table(vec!["1", "2", "3", ""]);
        assert!(drop_outliers(&mut t, 0));
        assert_eq!(t.row_count(), 3);
    }

    #[test]
    fn test_drop_outliers_no_outliers_keeps_rows() {
        let mut t = column_table(vec!["1", "2", "3", "4"]);
        assert!(drop_outliers(&mut t, 0));
        assert_eq!(t.row_count(), 4);
    }

    #[test]
    fn test_log_transform_domain() {
        let mut t = column_table(vec!["0", "-2", ""]);
        assert!(log_transform(&mut t, 0));
        assert_eq!(t.get(0, 0), Some("0"));
        // Out of domain: missing marker.
        assert_eq!(t.get(1, 0), Some(""));
        assert_eq!(t.get(2, 0), Some(""));
    }

    #[test]
    fn test_sqrt_transform_domain() {
        let mut t = column_table(vec!["4", "-1"]);
        assert!(sqrt_transform(&mut t, 0));
        assert_eq!(t.get(0, 0), Some("2"));
        assert_eq!(t.get(1, 0), Some(""));
    }
}
