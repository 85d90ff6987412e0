//! Structured text description of a dataset.
//!
//! [`profile_dataset`] is a pure function of the dataset: it produces a
//! [`ProfileReport`] made of named sections in a fixed order. Optional
//! sections are only appended when their trigger holds, never emitted empty:
//!
//! | Section           | Present when                                         |
//! |-------------------|------------------------------------------------------|
//! | `Overview`        | always                                               |
//! | `ColumnTypes`     | always                                               |
//! | `Statistics`      | always                                               |
//! | `DateRanges`      | a datetime column with at least one value            |
//! | `TopValues`       | a numeric column with at least one value             |
//! | `NegativeValues`  | some numeric column has a value below zero           |
//! | `Cardinality`     | at least one categorical column                      |
//!
//! A column whose statistics cannot be computed is left out of the affected
//! section only; the report itself is always produced.

use super::dataset::Dataset;
use super::profiling;
use super::types::{ColumnClassification, ColumnDescription, ColumnKind, ColumnStats};
use serde::{Deserialize, Serialize};

pub const TYPES_HEADER: &str = "Columns and data types:";
pub const STATISTICS_HEADER: &str = "Summary Statistics:";
pub const DATE_RANGES_HEADER: &str = "Date Ranges:";
pub const TOP_VALUES_HEADER: &str = "Top 5 highest values per numeric column:";
pub const NEGATIVE_VALUES_HEADER: &str = "Columns with negative values:";
pub const CARDINALITY_HEADER: &str = "Unique value counts for categorical columns:";

const TOP_VALUE_COUNT: usize = 5;
const MAX_CELL_WIDTH: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SectionKind {
    Overview,
    ColumnTypes,
    Statistics,
    DateRanges,
    TopValues,
    NegativeValues,
    Cardinality,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileSection {
    pub kind: SectionKind,
    pub header: Option<String>,
    pub lines: Vec<String>,
}

impl ProfileSection {
    pub fn render(&self) -> String {
        let mut out = Vec::with_capacity(self.lines.len() + 1);
        if let Some(header) = &self.header {
            out.push(header.as_str());
        }
        out.extend(self.lines.iter().map(String::as_str));
        out.join("\n")
    }
}

/// Ordered, immutable result of profiling a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileReport {
    sections: Vec<ProfileSection>,
}

impl ProfileReport {
    pub fn sections(&self) -> &[ProfileSection] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&ProfileSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    /// Sections separated by a blank line.
    pub fn to_text(&self) -> String {
        self.sections
            .iter()
            .map(ProfileSection::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl std::fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Appends sections in call order. Sections with a header but no lines are
/// dropped by [`ProfileBuilder::optional`], which is how conditional blocks
/// disappear instead of rendering as a lonely header.
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    sections: Vec<ProfileSection>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(
        mut self,
        kind: SectionKind,
        header: Option<&str>,
        lines: Vec<String>,
    ) -> Self {
        self.sections.push(ProfileSection {
            kind,
            header: header.map(str::to_owned),
            lines,
        });
        self
    }

    pub fn optional(self, kind: SectionKind, header: &str, lines: Vec<String>) -> Self {
        if lines.is_empty() {
            self
        } else {
            self.section(kind, Some(header), lines)
        }
    }

    pub fn build(self) -> ProfileReport {
        ProfileReport {
            sections: self.sections,
        }
    }
}

/// Profiles the dataset. Deterministic for a given dataset snapshot.
pub fn profile_dataset(dataset: &Dataset) -> ProfileReport {
    let classification = dataset.classify();
    profile_with(dataset, &classification)
}

pub fn profile_with(dataset: &Dataset, classification: &ColumnClassification) -> ProfileReport {
    let overview = format!(
        "The dataset contains {} rows and {} columns.",
        dataset.height(),
        dataset.width()
    );

    let type_lines = classification
        .iter()
        .map(|c| format!("- {}: {} ({})", c.name, c.kind, c.dtype))
        .collect();

    let descriptions = describe_columns(dataset, classification);

    let mut builder = ProfileBuilder::new()
        .section(SectionKind::Overview, None, vec![overview])
        .section(SectionKind::ColumnTypes, Some(TYPES_HEADER), type_lines)
        .section(
            SectionKind::Statistics,
            Some(STATISTICS_HEADER),
            render_statistics_table(&descriptions),
        );

    if classification.count(ColumnKind::Datetime) > 0 {
        builder = builder.optional(
            SectionKind::DateRanges,
            DATE_RANGES_HEADER,
            date_range_lines(dataset, classification),
        );
    }
    if classification.count(ColumnKind::Numeric) > 0 {
        builder = builder
            .optional(
                SectionKind::TopValues,
                TOP_VALUES_HEADER,
                top_value_lines(dataset, classification),
            )
            .optional(
                SectionKind::NegativeValues,
                NEGATIVE_VALUES_HEADER,
                negative_value_lines(dataset, classification),
            );
    }
    if classification.count(ColumnKind::Categorical) > 0 {
        builder = builder.optional(
            SectionKind::Cardinality,
            CARDINALITY_HEADER,
            cardinality_lines(dataset, classification),
        );
    }

    builder.build()
}

/// Statistics for every column; uncomputable columns are omitted.
pub fn describe_columns(
    dataset: &Dataset,
    classification: &ColumnClassification,
) -> Vec<ColumnDescription> {
    classification
        .iter()
        .filter_map(|info| {
            let stats = match info.kind {
                ColumnKind::Numeric => dataset
                    .float_column(&info.name)
                    .map(|ca| ColumnStats::Numeric(profiling::describe_numeric(&ca))),
                ColumnKind::Categorical | ColumnKind::Datetime => dataset
                    .text_values(&info.name)
                    .map(|v| ColumnStats::Frequency(profiling::describe_frequency(&v))),
            };
            match stats {
                Ok(stats) => Some(ColumnDescription {
                    name: info.name.clone(),
                    stats,
                }),
                Err(e) => {
                    tracing::debug!("Skipping statistics for '{}': {e:#}", info.name);
                    None
                }
            }
        })
        .collect()
}

fn date_range_lines(dataset: &Dataset, classification: &ColumnClassification) -> Vec<String> {
    classification
        .of_kind(ColumnKind::Datetime)
        .filter_map(|info| {
            let millis = dataset
                .timestamp_millis(&info.name)
                .inspect_err(|e| tracing::debug!("Skipping date range for '{}': {e:#}", info.name))
                .ok()?;
            let (min, max) = profiling::date_range(&millis)?;
            Some(format!(
                "- {} spans from {} to {}",
                info.name,
                min.format("%Y-%m-%d"),
                max.format("%Y-%m-%d")
            ))
        })
        .collect()
}

fn top_value_lines(dataset: &Dataset, classification: &ColumnClassification) -> Vec<String> {
    classification
        .of_kind(ColumnKind::Numeric)
        .filter_map(|info| {
            let ca = dataset
                .float_column(&info.name)
                .inspect_err(|e| tracing::debug!("Skipping top values for '{}': {e:#}", info.name))
                .ok()?;
            let top = profiling::top_values(&ca, TOP_VALUE_COUNT);
            if top.is_empty() {
                return None;
            }
            let joined = top
                .into_iter()
                .map(profiling::format_number)
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("- {}: {joined}", info.name))
        })
        .collect()
}

fn negative_value_lines(dataset: &Dataset, classification: &ColumnClassification) -> Vec<String> {
    classification
        .of_kind(ColumnKind::Numeric)
        .filter_map(|info| {
            let ca = dataset.float_column(&info.name).ok()?;
            let negatives = profiling::negative_count(&ca);
            (negatives > 0).then(|| format!("- {}: {negatives} negative values", info.name))
        })
        .collect()
}

fn cardinality_lines(dataset: &Dataset, classification: &ColumnClassification) -> Vec<String> {
    classification
        .of_kind(ColumnKind::Categorical)
        .filter_map(|info| {
            let values = dataset
                .text_values(&info.name)
                .inspect_err(|e| tracing::debug!("Skipping cardinality for '{}': {e:#}", info.name))
                .ok()?;
            Some(format!(
                "- {}: {} unique values",
                info.name,
                profiling::distinct_count(&values)
            ))
        })
        .collect()
}

/// Renders a describe-style table: one column per dataset column, one row
/// per statistic. Cells that do not apply print `NaN`.
pub fn render_statistics_table(descriptions: &[ColumnDescription]) -> Vec<String> {
    if descriptions.is_empty() {
        return vec!["(no statistics available)".to_owned()];
    }

    let has_frequency = descriptions
        .iter()
        .any(|d| matches!(d.stats, ColumnStats::Frequency(_)));
    let has_numeric = descriptions
        .iter()
        .any(|d| matches!(d.stats, ColumnStats::Numeric(_)));

    let mut row_labels = vec!["count"];
    if has_frequency {
        row_labels.extend(["unique", "top", "freq"]);
    }
    if has_numeric {
        row_labels.extend(["mean", "std", "min", "25%", "50%", "75%", "max"]);
    }

    let columns: Vec<(String, Vec<String>)> = descriptions
        .iter()
        .map(|d| {
            let cells = row_labels.iter().map(|label| stat_cell(&d.stats, label)).collect();
            (fit_cell(&d.name), cells)
        })
        .collect();

    let label_width = row_labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .map(|(name, cells)| {
            cells
                .iter()
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(row_labels.len() + 1);

    let mut header = " ".repeat(label_width);
    for ((name, _), width) in columns.iter().zip(widths.iter().copied()) {
        header.push_str(&format!("  {name:>width$}"));
    }
    lines.push(header.trim_end().to_owned());

    for (row, label) in row_labels.iter().enumerate() {
        let mut line = format!("{label:<label_width$}");
        for ((_, cells), width) in columns.iter().zip(widths.iter().copied()) {
            let cell = cells.get(row).map(String::as_str).unwrap_or("NaN");
            line.push_str(&format!("  {cell:>width$}"));
        }
        lines.push(line);
    }

    lines
}

fn stat_cell(stats: &ColumnStats, label: &str) -> String {
    let number = |v: Option<f64>| v.map(profiling::format_number).unwrap_or_else(|| "NaN".to_owned());

    match (stats, label) {
        (ColumnStats::Numeric(s), "count") => s.count.to_string(),
        (ColumnStats::Numeric(s), "mean") => number(s.mean),
        (ColumnStats::Numeric(s), "std") => number(s.std_dev),
        (ColumnStats::Numeric(s), "min") => number(s.min),
        (ColumnStats::Numeric(s), "25%") => number(s.q1),
        (ColumnStats::Numeric(s), "50%") => number(s.median),
        (ColumnStats::Numeric(s), "75%") => number(s.q3),
        (ColumnStats::Numeric(s), "max") => number(s.max),
        (ColumnStats::Frequency(s), "count") => s.count.to_string(),
        (ColumnStats::Frequency(s), "unique") => s.unique.to_string(),
        (ColumnStats::Frequency(s), "top") => s
            .top
            .as_ref()
            .map(|(value, _)| fit_cell(value))
            .unwrap_or_else(|| "NaN".to_owned()),
        (ColumnStats::Frequency(s), "freq") => s
            .top
            .as_ref()
            .map(|(_, freq)| freq.to_string())
            .unwrap_or_else(|| "NaN".to_owned()),
        _ => "NaN".to_owned(),
    }
}

/// Single-line, width-capped rendering of a free-text cell.
fn fit_cell(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() > MAX_CELL_WIDTH {
        let cut: String = flat.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
