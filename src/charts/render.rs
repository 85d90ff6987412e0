//! Stateless exhibit rendering.
//!
//! Every exhibit is drawn into its own pixel buffer, encoded to PNG and
//! written to `<output_dir>/<name>.png`. Nothing is shared between two
//! renders, so one broken chart cannot poison the next.

use super::plan::{ExhibitKind, ExhibitPlan};
use super::stats::{self, Bin};
use crate::analyser::Dataset;
use crate::analyser::profiling::value_counts;
use crate::error::{ReportError, Result};
use anyhow::Context as _;
use chrono::DateTime;
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CORRELATION_SIZE: (u32, u32) = (1000, 800);
const MISSINGNESS_SIZE: (u32, u32) = (1000, 500);
const DISTRIBUTION_SIZE: (u32, u32) = (800, 400);
const CATEGORY_SIZE: (u32, u32) = (1000, 400);
const TEMPORAL_SIZE: (u32, u32) = (1200, 600);

const DENSITY_POINTS: usize = 200;
const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const LINE_COLOR: RGBColor = RGBColor(221, 132, 82);

/// One rendered chart on disk.
#[derive(Clone, Debug)]
pub struct VisualizationArtifact {
    pub name: String,
    pub png: Vec<u8>,
    pub path: PathBuf,
}

impl VisualizationArtifact {
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

/// A planned exhibit that failed to render and was left out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedExhibit {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct VisualizationOutput {
    pub artifacts: Vec<VisualizationArtifact>,
    pub skipped: Vec<SkippedExhibit>,
}

/// Renders every plan in order.
///
/// Failing to create `output_dir` is fatal. A failure while drawing or
/// writing a single exhibit is recorded in [`VisualizationOutput::skipped`]
/// and the remaining plans still run. Existing files with the same name are
/// overwritten.
pub fn render_exhibits(
    dataset: &Dataset,
    plans: &[ExhibitPlan],
    output_dir: &Path,
) -> Result<VisualizationOutput> {
    std::fs::create_dir_all(output_dir)?;

    let mut output = VisualizationOutput::default();
    for plan in plans {
        let path = output_dir.join(plan.file_name());
        let rendered = render_exhibit(dataset, plan).and_then(|png| {
            std::fs::write(&path, &png)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(png)
        });

        match rendered {
            Ok(png) => {
                debug!("Rendered {} ({} bytes)", plan.name, png.len());
                output.artifacts.push(VisualizationArtifact {
                    name: plan.name.clone(),
                    png,
                    path,
                });
            }
            Err(e) => {
                warn!("Skipping exhibit {}: {e:#}", plan.name);
                output.skipped.push(SkippedExhibit {
                    name: plan.name.clone(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    info!(
        "Rendered {} exhibit(s) into {} ({} skipped)",
        output.artifacts.len(),
        output_dir.display(),
        output.skipped.len()
    );
    Ok(output)
}

/// Draws one exhibit and returns the encoded PNG.
pub fn render_exhibit(dataset: &Dataset, plan: &ExhibitPlan) -> anyhow::Result<Vec<u8>> {
    match &plan.kind {
        ExhibitKind::Correlation { columns } => draw_correlation(dataset, columns, &plan.title),
        ExhibitKind::Missingness { columns } => draw_missingness(columns, &plan.title),
        ExhibitKind::Distribution {
            column,
            binning,
            density,
        } => {
            let values: Vec<f64> = dataset.float_column(column)?.into_iter().flatten().collect();
            let bins = stats::histogram(&values, *binning);
            let curve = if *density {
                let width = bins.first().map(|b| b.end - b.start).unwrap_or(1.0);
                stats::density_curve(&values, DENSITY_POINTS, width)
            } else {
                Vec::new()
            };
            draw_distribution(&bins, &curve, column, &plan.title)
        }
        ExhibitKind::Category { column } => {
            let counts = value_counts(&dataset.text_values(column)?);
            draw_category(&counts, column, &plan.title)
        }
        ExhibitKind::Temporal {
            date_column,
            value_column,
        } => {
            let times = dataset.timestamp_millis(date_column)?;
            let values: Vec<Option<f64>> =
                dataset.float_column(value_column)?.into_iter().collect();
            let series = stats::sum_by_time(&times, &values);
            draw_temporal(&series, date_column, value_column, &plan.title)
        }
    }
    .with_context(|| format!("rendering {}", plan.name))
}

/// Runs `draw` against a fresh white canvas and returns PNG bytes.
fn draw_png<F>(size: (u32, u32), draw: F) -> anyhow::Result<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> anyhow::Result<()>,
{
    let (width, height) = size;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    let image = RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| ReportError::Render("pixel buffer does not match image size".into()))?;
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image).write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

fn padded(min: f64, max: f64) -> Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

fn label_style(size: u32, anchor: Pos) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(anchor)
}

fn draw_correlation(dataset: &Dataset, columns: &[String], title: &str) -> anyhow::Result<Vec<u8>> {
    let data = columns
        .iter()
        .map(|c| -> anyhow::Result<Vec<Option<f64>>> {
            Ok(dataset.float_column(c)?.into_iter().collect())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let matrix = stats::correlation_matrix(&data);
    let n = columns.len();

    draw_png(CORRELATION_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(140)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&|_| String::new())
            .y_label_formatter(&|_| String::new())
            .draw()?;

        // row 0 is drawn at the top
        let cells = matrix.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, value)| (col as f64, (n - row - 1) as f64, *value))
        });
        let cells: Vec<(f64, f64, Option<f64>)> = cells.collect();

        chart.draw_series(cells.iter().map(|&(x, y, value)| {
            let (r, g, b) = value.map_or((255, 255, 255), stats::diverging_color);
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], RGBColor(r, g, b).filled())
        }))?;
        chart.draw_series(cells.iter().map(|&(x, y, value)| {
            let text = value.map_or_else(|| "nan".to_owned(), |v| format!("{v:.2}"));
            let color: &'static RGBColor = if value.is_some_and(|v| v.abs() > 0.6) {
                &WHITE
            } else {
                &BLACK
            };
            Text::new(
                text,
                (x + 0.5, y + 0.5),
                label_style(16, Pos::new(HPos::Center, VPos::Center)).color(color),
            )
        }))?;

        for (i, name) in columns.iter().enumerate() {
            let (bx, by) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
            root.draw(&Text::new(
                name.clone(),
                (bx, by + 8),
                label_style(14, Pos::new(HPos::Center, VPos::Top)),
            ))?;
            let (lx, ly) = chart.backend_coord(&(0.0, (n - i - 1) as f64 + 0.5));
            root.draw(&Text::new(
                name.clone(),
                (lx - 8, ly),
                label_style(14, Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        Ok(())
    })
}

fn draw_missingness(columns: &[(String, usize)], title: &str) -> anyhow::Result<Vec<u8>> {
    let top = columns.iter().map(|c| c.1).max().unwrap_or(1) as f64;
    let k = columns.len() as f64;

    draw_png(MISSINGNESS_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..k, 0f64..top * 1.1)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_desc("Missing values")
            .draw()?;

        chart.draw_series(columns.iter().enumerate().map(|(i, (_, count))| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *count as f64)], BAR_COLOR.filled())
        }))?;

        for (i, (name, _)) in columns.iter().enumerate() {
            let (bx, by) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
            root.draw(&Text::new(
                name.clone(),
                (bx, by + 8),
                label_style(14, Pos::new(HPos::Center, VPos::Top)),
            ))?;
        }
        Ok(())
    })
}

fn draw_distribution(
    bins: &[Bin],
    curve: &[(f64, f64)],
    column: &str,
    title: &str,
) -> anyhow::Result<Vec<u8>> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(ReportError::Render(format!("no values to plot for {column}")).into());
    };
    let peak = bins
        .iter()
        .map(|b| b.count as f64)
        .chain(curve.iter().map(|p| p.1))
        .fold(1.0, f64::max);

    draw_png(DISTRIBUTION_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(first.start..last.end, 0f64..peak * 1.1)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(column)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BAR_COLOR.filled())
        }))?;
        if !curve.is_empty() {
            chart.draw_series(LineSeries::new(
                curve.iter().copied(),
                LINE_COLOR.stroke_width(2),
            ))?;
        }
        Ok(())
    })
}

fn draw_category(counts: &[(String, usize)], column: &str, title: &str) -> anyhow::Result<Vec<u8>> {
    if counts.is_empty() {
        return Err(ReportError::Render(format!("no values to plot for {column}")).into());
    }
    let top = counts.iter().map(|c| c.1).max().unwrap_or(1) as f64;
    let k = counts.len();

    draw_png(CATEGORY_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(160)
            .build_cartesian_2d(0f64..top * 1.1, 0f64..k as f64)?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_label_formatter(&|_| String::new())
            .x_desc("Count")
            .draw()?;

        // most frequent value on the top row
        chart.draw_series(counts.iter().enumerate().map(|(rank, (_, count))| {
            let y = (k - rank - 1) as f64;
            Rectangle::new([(0.0, y + 0.1), (*count as f64, y + 0.9)], BAR_COLOR.filled())
        }))?;

        for (rank, (value, _)) in counts.iter().enumerate() {
            let (bx, by) = chart.backend_coord(&(0.0, (k - rank - 1) as f64 + 0.5));
            root.draw(&Text::new(
                value.clone(),
                (bx - 8, by),
                label_style(13, Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }
        Ok(())
    })
}

fn format_millis(millis: f64) -> String {
    DateTime::from_timestamp_millis(millis as i64)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn draw_temporal(
    series: &[(i64, f64)],
    date_column: &str,
    value_column: &str,
    title: &str,
) -> anyhow::Result<Vec<u8>> {
    if series.is_empty() {
        return Err(ReportError::Render(format!(
            "no rows with both {date_column} and {value_column}"
        ))
        .into());
    }
    let points: Vec<(f64, f64)> = series.iter().map(|&(t, v)| (t as f64, v)).collect();
    let (t_min, t_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.0), hi.max(p.0))
        });
    let (v_min, v_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.1), hi.max(p.1))
        });
    let x_range = if (t_max - t_min).abs() < f64::EPSILON {
        const DAY_MS: f64 = 86_400_000.0;
        (t_min - DAY_MS)..(t_max + DAY_MS)
    } else {
        t_min..t_max
    };

    draw_png(TEMPORAL_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, padded(v_min, v_max))?;
        chart
            .configure_mesh()
            .x_label_formatter(&|v| format_millis(*v))
            .x_labels(8)
            .x_desc(date_column)
            .y_desc(value_column)
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            BAR_COLOR.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, 3, BAR_COLOR.filled())),
        )?;
        Ok(())
    })
}
