//! Chart selection and rendering.
//!
//! [`plan::plan_exhibits`] decides which charts a dataset gets and in which
//! order; [`render::render_exhibits`] draws them. [`generate_visualizations`]
//! runs both.

pub mod plan;
pub mod render;
pub mod stats;

pub use plan::{Binning, ChartSettings, ExhibitKind, ExhibitPlan, plan_exhibits};
pub use render::{SkippedExhibit, VisualizationArtifact, VisualizationOutput, render_exhibits};

use crate::analyser::{ColumnClassification, Dataset};
use crate::error::Result;
use std::path::Path;
use tracing::info;

pub fn generate_visualizations(
    dataset: &Dataset,
    classification: &ColumnClassification,
    settings: &ChartSettings,
    output_dir: &Path,
) -> Result<VisualizationOutput> {
    let plans = plan_exhibits(dataset, classification, settings);
    info!("Planned {} exhibit(s)", plans.len());
    render_exhibits(dataset, &plans, output_dir)
}

#[cfg(test)]
mod tests;
