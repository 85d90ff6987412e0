use super::dataset::Dataset;
use crate::error::{ReportError, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Cell values read as missing in every column.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parses comma-delimited text with a header row.
///
/// ISO dates and datetimes are recognised during parsing, so such columns
/// come back as `Date`/`Datetime` dtypes rather than strings. Dtypes are
/// inferred over every row, so a non-numeric value deep in the file turns
/// the column into text instead of failing the read. Empty cells and the
/// common missing markers (`NA`, `N/A`, `null`, ...) become nulls.
///
/// # Errors
///
/// Returns [`ReportError::InvalidInput`] when the text cannot be parsed or
/// yields no columns.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Dataset> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ReportError::InvalidInput("input is empty".to_owned()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| {
            opts.with_try_parse_dates(true)
                .with_null_values(Some(NullValues::AllColumns(
                    NULL_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect(),
                )))
        })
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| ReportError::InvalidInput(format!("Failed to read CSV: {e}")))?;

    tracing::debug!("Parsed CSV into {} rows x {} columns", df.height(), df.width());
    Dataset::new(df)
}

/// Reads a CSV file from disk, see [`load_csv_bytes`].
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be read, otherwise the
/// errors of [`load_csv_bytes`].
pub fn load_csv_path(path: &Path) -> Result<Dataset> {
    let bytes = std::fs::read(path)?;
    load_csv_bytes(&bytes)
}
