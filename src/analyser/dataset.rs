//! Read-only dataset wrapper around a polars `DataFrame`.
//!
//! The frame is never mutated after construction. Column accessors return
//! owned, normalised views (floats, strings or epoch milliseconds) so the
//! profiler and the chart renderer do not each repeat the casting rules.

use super::types::{ColumnClassification, ColumnInfo, ColumnKind};
use crate::error::{ReportError, Result};
use anyhow::Context as _;
use polars::prelude::*;

#[derive(Clone, Debug)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Wraps a frame, rejecting frames without columns.
    pub fn new(df: DataFrame) -> Result<Self> {
        if df.width() == 0 {
            return Err(ReportError::InvalidInput(
                "dataset has no columns".to_owned(),
            ));
        }
        Ok(Self { df })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Assigns every column to exactly one [`ColumnKind`], in column order.
    pub fn classify(&self) -> ColumnClassification {
        let columns = self
            .df
            .get_columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name().to_string(),
                kind: kind_for_dtype(c.dtype()),
                dtype: c.dtype().to_string(),
            })
            .collect();
        ColumnClassification::new(columns)
    }

    pub fn null_count(&self, name: &str) -> anyhow::Result<usize> {
        Ok(self.column(name)?.null_count())
    }

    /// Column cast to `f64`.
    pub fn float_column(&self, name: &str) -> anyhow::Result<Float64Chunked> {
        let series = self.column(name)?.as_materialized_series();
        let casted = series
            .cast(&DataType::Float64)
            .with_context(|| format!("Column '{name}' is not numeric"))?;
        Ok(casted.f64()?.clone())
    }

    /// Column rendered as strings, nulls preserved.
    pub fn text_values(&self, name: &str) -> anyhow::Result<Vec<Option<String>>> {
        let series = self.column(name)?.as_materialized_series();
        let casted = series
            .cast(&DataType::String)
            .with_context(|| format!("Column '{name}' cannot be read as text"))?;
        Ok(casted
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect())
    }

    /// Date/datetime column as milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self, name: &str) -> anyhow::Result<Vec<Option<i64>>> {
        let series = self.column(name)?.as_materialized_series();
        let casted = series
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .and_then(|s| s.cast(&DataType::Int64))
            .with_context(|| format!("Column '{name}' is not temporal"))?;
        Ok(casted.i64()?.into_iter().collect())
    }

    fn column(&self, name: &str) -> anyhow::Result<&Column> {
        self.df
            .column(name)
            .with_context(|| format!("Column '{name}' not found"))
    }
}

/// Integer and float dtypes are numeric, dates and datetimes are temporal,
/// everything else (strings, booleans, all-null columns) is categorical.
pub fn kind_for_dtype(dtype: &DataType) -> ColumnKind {
    match dtype {
        DataType::Date | DataType::Datetime(_, _) => ColumnKind::Datetime,
        dt if dt.is_numeric() => ColumnKind::Numeric,
        _ => ColumnKind::Categorical,
    }
}
