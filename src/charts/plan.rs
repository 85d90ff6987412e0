//! Exhibit selection.
//!
//! Selection is separated from drawing: [`plan_exhibits`] looks only at the
//! classification and null counts and returns the ordered list of charts the
//! report will contain. The order is the page order of the final document:
//! correlation, missingness, one distribution per numeric column, one
//! category chart per categorical column, then at most one temporal chart.

use crate::analyser::naming::unique_file_tokens;
use crate::analyser::{ColumnClassification, ColumnKind, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CORRELATION_NAME: &str = "correlation_heatmap";
pub const MISSINGNESS_NAME: &str = "missing_values_barplot";

/// Scale-dependent rendering thresholds.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Datasets with more rows than this get fixed bins and no density curve.
    pub density_row_limit: usize,
    /// Bin count used above `density_row_limit`.
    pub large_dataset_bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            density_row_limit: 50_000,
            large_dataset_bins: 50,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Binning {
    /// Freedman-Diaconis width, clamped to a sensible bin count.
    Auto,
    Fixed(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum ExhibitKind {
    Correlation {
        columns: Vec<String>,
    },
    Missingness {
        /// Columns with at least one missing value and their counts.
        columns: Vec<(String, usize)>,
    },
    Distribution {
        column: String,
        binning: Binning,
        density: bool,
    },
    Category {
        column: String,
    },
    Temporal {
        date_column: String,
        value_column: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExhibitPlan {
    /// Stable artifact name, also the file stem.
    pub name: String,
    pub title: String,
    pub kind: ExhibitKind,
}

impl ExhibitPlan {
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

pub fn plan_exhibits(
    dataset: &Dataset,
    classification: &ColumnClassification,
    settings: &ChartSettings,
) -> Vec<ExhibitPlan> {
    let names: Vec<&str> = classification.iter().map(|c| c.name.as_str()).collect();
    let tokens: HashMap<&str, String> = names
        .iter()
        .copied()
        .zip(unique_file_tokens(&names))
        .collect();
    let token = |name: &str| tokens.get(name).cloned().unwrap_or_else(|| name.to_owned());

    let nulls: HashMap<&str, usize> = names
        .iter()
        .map(|&name| (name, dataset.null_count(name).unwrap_or_default()))
        .collect();
    let present = |name: &str| dataset.height() > nulls.get(name).copied().unwrap_or_default();

    let mut plans = Vec::new();

    let numeric: Vec<&str> = classification
        .of_kind(ColumnKind::Numeric)
        .map(|c| c.name.as_str())
        .collect();

    if numeric.len() >= 2 {
        plans.push(ExhibitPlan {
            name: CORRELATION_NAME.to_owned(),
            title: "Correlation Heatmap".to_owned(),
            kind: ExhibitKind::Correlation {
                columns: numeric.iter().map(|&s| s.to_owned()).collect(),
            },
        });
    }

    let missing: Vec<(String, usize)> = names
        .iter()
        .filter_map(|&name| {
            let count = nulls.get(name).copied().unwrap_or_default();
            (count > 0).then(|| (name.to_owned(), count))
        })
        .collect();
    if !missing.is_empty() {
        plans.push(ExhibitPlan {
            name: MISSINGNESS_NAME.to_owned(),
            title: "Missing Values Count per Column".to_owned(),
            kind: ExhibitKind::Missingness { columns: missing },
        });
    }

    let large = dataset.height() > settings.density_row_limit;
    for &column in numeric.iter().filter(|&&c| present(c)) {
        plans.push(ExhibitPlan {
            name: format!("hist_{}", token(column)),
            title: format!("Distribution of {column}"),
            kind: ExhibitKind::Distribution {
                column: column.to_owned(),
                binning: if large {
                    Binning::Fixed(settings.large_dataset_bins)
                } else {
                    Binning::Auto
                },
                density: !large,
            },
        });
    }

    for info in classification
        .of_kind(ColumnKind::Categorical)
        .filter(|c| present(&c.name))
    {
        plans.push(ExhibitPlan {
            name: format!("countplot_{}", token(&info.name)),
            title: format!("Counts of {}", info.name),
            kind: ExhibitKind::Category {
                column: info.name.clone(),
            },
        });
    }

    // Deliberately the first datetime and first numeric column by position;
    // no attempt is made to pick a "better" pair.
    if let (Some(date), Some(value)) = (
        classification.first_of(ColumnKind::Datetime),
        classification.first_of(ColumnKind::Numeric),
    ) && has_complete_pair(dataset, &date.name, &value.name)
    {
        plans.push(ExhibitPlan {
            name: format!("time_series_{}", token(&value.name)),
            title: format!("{} over Time", value.name),
            kind: ExhibitKind::Temporal {
                date_column: date.name.clone(),
                value_column: value.name.clone(),
            },
        });
    }

    plans
}

fn has_complete_pair(dataset: &Dataset, date_column: &str, value_column: &str) -> bool {
    let (Ok(times), Ok(values)) = (
        dataset.timestamp_millis(date_column),
        dataset.float_column(value_column),
    ) else {
        return false;
    };
    times
        .iter()
        .zip(&values)
        .any(|(t, v)| t.is_some() && v.is_some())
}
