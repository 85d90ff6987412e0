//! End-to-end report generation.
//!
//! ```no_run
//! use eda_report::ai::PassthroughSummarizer;
//! use eda_report::analyser::load_csv_path;
//! use eda_report::pipeline::{ReportRequest, generate_report};
//!
//! # async fn example() -> eda_report::error::Result<()> {
//! let dataset = load_csv_path("sales.csv".as_ref())?;
//! let report = generate_report(&dataset, &ReportRequest::default(), &PassthroughSummarizer).await?;
//! std::fs::write(report.document.file_name(), &report.document.bytes)?;
//! # Ok(())
//! # }
//! ```

use crate::ai::{Summarizer, summarize_or_fallback};
use crate::analyser::summary::profile_with;
use crate::analyser::{Dataset, ProfileReport};
use crate::charts::{ChartSettings, VisualizationArtifact, generate_visualizations};
use crate::config::ReportSettings;
use crate::error::Result;
use crate::report::{RenderedReport, ReportFormat, synthesize};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub format: ReportFormat,
    pub output_dir: PathBuf,
    pub charts: ChartSettings,
    /// Bound on the single summarization attempt.
    pub summary_timeout: Duration,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self::from(&ReportSettings::default())
    }
}

impl From<&ReportSettings> for ReportRequest {
    fn from(settings: &ReportSettings) -> Self {
        Self {
            format: settings.format,
            output_dir: settings.output_dir.clone(),
            charts: settings.charts.clone(),
            summary_timeout: Duration::from_secs(settings.ai.timeout_secs),
        }
    }
}

/// Non-fatal problems; generation still completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportWarning {
    SummaryFallback { reason: String },
    ExhibitSkipped { name: String, reason: String },
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SummaryFallback { reason } => {
                write!(f, "AI summary unavailable, using the raw profile ({reason})")
            }
            Self::ExhibitSkipped { name, reason } => {
                write!(f, "Chart {name} was left out ({reason})")
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedReport {
    /// Profile as computed, before summarization.
    pub profile: ProfileReport,
    /// Text that went into the document.
    pub summary: String,
    pub artifacts: Vec<VisualizationArtifact>,
    pub document: RenderedReport,
    pub warnings: Vec<ReportWarning>,
    pub duration: Duration,
}

impl GeneratedReport {
    pub fn summary_line(&self) -> String {
        format!(
            "{} written: {} exhibit(s), {} warning(s), {:.2}s",
            self.document.file_name(),
            self.artifacts.len(),
            self.warnings.len(),
            self.duration.as_secs_f64()
        )
    }
}

/// Classify, profile, summarize, draw and assemble.
///
/// Fails only on fatal problems: the output directory cannot be created or
/// the document cannot be assembled. Summarization and single-chart
/// failures become [`ReportWarning`]s.
pub async fn generate_report(
    dataset: &Dataset,
    request: &ReportRequest,
    summarizer: &dyn Summarizer,
) -> Result<GeneratedReport> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let classification = dataset.classify();
    info!(
        "Generating {} report for {} rows x {} columns",
        request.format,
        dataset.height(),
        dataset.width()
    );

    let profile = profile_with(dataset, &classification);
    let outcome =
        summarize_or_fallback(summarizer, &profile.to_text(), request.summary_timeout).await;
    if let Some(reason) = outcome.fallback_reason {
        warnings.push(ReportWarning::SummaryFallback { reason });
    }

    let visuals =
        generate_visualizations(dataset, &classification, &request.charts, &request.output_dir)?;
    warnings.extend(
        visuals
            .skipped
            .into_iter()
            .map(|s| ReportWarning::ExhibitSkipped {
                name: s.name,
                reason: s.reason,
            }),
    );

    let document = synthesize(&outcome.text, &visuals.artifacts, request.format)?;

    for warning in &warnings {
        warn!("{warning}");
    }
    let report = GeneratedReport {
        profile,
        summary: outcome.text,
        artifacts: visuals.artifacts,
        document,
        warnings,
        duration: start.elapsed(),
    };
    info!("{}", report.summary_line());
    Ok(report)
}
