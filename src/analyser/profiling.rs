//! Per-column statistics used by the dataset summary.
//!
//! Numeric columns are described with polars aggregations (mean, sample
//! standard deviation, linearly interpolated quartiles). Categorical and
//! datetime columns are described by frequency: non-missing count, distinct
//! count and the most frequent value.
//!
//! Functions here are total over empty and all-null input: they return
//! `None`/zero instead of failing, so the summary never aborts on a sparse
//! column.

use super::types::{FrequencyStats, NumericStats};
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use std::collections::HashMap;

pub fn describe_numeric(ca: &Float64Chunked) -> NumericStats {
    let quantile = |q: f64| ca.quantile(q, QuantileMethod::Linear).unwrap_or(None);

    NumericStats {
        count: ca.len() - ca.null_count(),
        mean: ca.mean(),
        std_dev: ca.std(1),
        min: ca.min(),
        q1: quantile(0.25),
        median: quantile(0.5),
        q3: quantile(0.75),
        max: ca.max(),
    }
}

pub fn describe_frequency(values: &[Option<String>]) -> FrequencyStats {
    let counts = value_counts(values);
    FrequencyStats {
        count: values.iter().flatten().count(),
        unique: counts.len(),
        top: counts.into_iter().next(),
    }
}

/// Non-missing values with their frequencies, most frequent first.
///
/// Ties keep the order in which values first appear, which keeps the output
/// stable across runs.
pub fn value_counts(values: &[Option<String>]) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values.iter().flatten() {
        if let Some(&pos) = index.get(value.as_str()) {
            if let Some(entry) = counts.get_mut(pos) {
                entry.1 += 1;
            }
        } else {
            index.insert(value.as_str(), counts.len());
            counts.push((value.clone(), 1));
        }
    }

    // stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn distinct_count(values: &[Option<String>]) -> usize {
    let mut seen = std::collections::HashSet::new();
    values.iter().flatten().filter(|v| seen.insert(v.as_str())).count()
}

/// Largest `n` non-missing values, descending. Duplicates are kept.
pub fn top_values(ca: &Float64Chunked, n: usize) -> Vec<f64> {
    let mut values: Vec<f64> = ca.into_iter().flatten().filter(|v| !v.is_nan()).collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values.truncate(n);
    values
}

pub fn negative_count(ca: &Float64Chunked) -> usize {
    ca.into_iter().flatten().filter(|&v| v < 0.0).count()
}

/// Earliest and latest calendar day of a column of epoch milliseconds.
pub fn date_range(millis: &[Option<i64>]) -> Option<(NaiveDate, NaiveDate)> {
    let min = millis.iter().flatten().min()?;
    let max = millis.iter().flatten().max()?;
    let to_date = |ms: i64| DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive());
    Some((to_date(*min)?, to_date(*max)?))
}

/// Rounds to 2 decimals; integral results print without a fractional part.
/// Non-finite values print as `NaN`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }

    let mut rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // avoid printing "-0"
        rounded = 0.0;
    }

    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        let text = format!("{rounded:.2}");
        text.trim_end_matches('0').to_owned()
    }
}
