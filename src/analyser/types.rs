use serde::{Deserialize, Serialize};

/// Semantic type of a column, inferred from its storage dtype.
///
/// Every column lands in exactly one kind; downstream stages match on it
/// exhaustively instead of re-inspecting dtypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Datetime => "datetime",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    /// Storage dtype as reported by polars, e.g. `f64` or `date`.
    pub dtype: String,
}

/// Column name → kind, in original column order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ColumnClassification {
    columns: Vec<ColumnInfo>,
}

impl ColumnClassification {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    pub fn count(&self, kind: ColumnKind) -> usize {
        self.of_kind(kind).count()
    }

    /// First column of the given kind by original column order.
    pub fn first_of(&self, kind: ColumnKind) -> Option<&ColumnInfo> {
        self.of_kind(kind).next()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }
}

/// Descriptive statistics for a numeric column. Every field is `None` when
/// the column has no non-missing values.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NumericStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Frequency statistics for categorical and datetime columns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrequencyStats {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value and its frequency; ties go to the first value seen.
    pub top: Option<(String, usize)>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum ColumnStats {
    Numeric(NumericStats),
    Frequency(FrequencyStats),
}

/// One column of the summary statistics table.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ColumnDescription {
    pub name: String,
    pub stats: ColumnStats,
}
