//! Error types for report generation.
//!
//! Every public stage entry point returns [`Result`], whose error is a
//! [`ReportError`]. The variants follow the points at which a request can
//! fail:
//!
//! - malformed input is rejected before any stage runs ([`ReportError::InvalidInput`])
//! - a single chart failing to draw is *not* an error; it becomes a warning
//!   in the pipeline and only [`ReportError::Render`] is used internally
//! - a document that cannot be assembled aborts the request
//!   ([`ReportError::Assembly`]) so callers never receive a half-written buffer
//!
//! ```
//! use eda_report::error::ReportError;
//!
//! fn describe(err: &ReportError) -> &'static str {
//!     match err {
//!         ReportError::InvalidInput(_) => "fix the CSV and retry",
//!         ReportError::Assembly(_) => "report could not be built",
//!         _ => "unexpected failure",
//!     }
//! }
//! ```
//!
//! Internal helpers mostly use `anyhow` and are converted at the stage
//! boundary through the `From` impls below, so `?` works across both.

use std::fmt;

/// Main error type for report generation.
#[derive(Debug)]
pub enum ReportError {
    /// I/O errors (reading input, writing artifacts or documents)
    Io(std::io::Error),

    /// Input that cannot become a dataset (unparseable text, zero columns)
    InvalidInput(String),

    /// Polars failures while reading or inspecting columns
    DataProcessing(String),

    /// A chart could not be drawn or encoded
    Render(String),

    /// The final document could not be assembled
    Assembly(String),

    /// Settings file problems
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Render(msg) => write!(f, "Rendering error: {msg}"),
            Self::Assembly(msg) => write!(f, "Report assembly failed: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        Self::Other(format!("{err:#}"))
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for ReportError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<printpdf::Error> for ReportError {
    fn from(err: printpdf::Error) -> Self {
        Self::Assembly(format!("PDF encoding: {err}"))
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ReportError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(e.into(), msg.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Prefixes the message while keeping the variant, so an assembly failure
/// stays an assembly failure after context is added.
fn wrap(err: ReportError, msg: String) -> ReportError {
    match err {
        ReportError::InvalidInput(inner) => ReportError::InvalidInput(format!("{msg}: {inner}")),
        ReportError::Render(inner) => ReportError::Render(format!("{msg}: {inner}")),
        ReportError::Assembly(inner) => ReportError::Assembly(format!("{msg}: {inner}")),
        ReportError::Config(inner) => ReportError::Config(format!("{msg}: {inner}")),
        other => ReportError::Other(format!("{msg}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::InvalidInput("no columns".to_owned());
        assert_eq!(err.to_string(), "Invalid input: no columns");
    }

    #[test]
    fn test_context_keeps_assembly_variant() {
        let result: Result<()> = Err(ReportError::Assembly("missing image".to_owned()));
        let err = result.context("Building PDF").unwrap_err();
        assert!(matches!(err, ReportError::Assembly(_)));
        assert_eq!(
            err.to_string(),
            "Report assembly failed: Building PDF: missing image"
        );
    }

    #[test]
    fn test_result_context_on_io() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file.csv",
        ));

        let result: Result<()> = result.context("Failed to read file");
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Failed to read file"));
        assert!(message.contains("file.csv"));
    }
}
