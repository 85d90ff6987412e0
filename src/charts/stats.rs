//! Numeric helpers behind the charts: binning, kernel density, correlation
//! and temporal aggregation. Pure functions over plain slices.

use super::plan::Binning;
use std::collections::BTreeMap;

const MIN_AUTO_BINS: usize = 5;
const MAX_AUTO_BINS: usize = 50;
const DEGENERATE_BINS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let lo = *sorted.get(lower)?;
    let hi = *sorted.get(upper)?;
    Some(lo + (hi - lo) * (pos - lower as f64))
}

/// Histogram of the finite values.
///
/// `Binning::Auto` uses the Freedman-Diaconis width (falling back to the
/// square-root rule when the IQR is zero) and clamps the result to 5..=50
/// bins. A column holding a single distinct value gets unit-width bins
/// centred on that value so the chart still has an x extent.
pub fn histogram(values: &[f64], binning: Binning) -> Vec<Bin> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(f64::total_cmp);

    let (min, max) = match (sorted.first(), sorted.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return Vec::new(),
    };

    if (max - min).abs() < f64::EPSILON {
        let num_bins = match binning {
            Binning::Auto => DEGENERATE_BINS,
            Binning::Fixed(n) => n.max(1),
        };
        let start = min - (num_bins / 2) as f64;
        return (0..num_bins)
            .map(|i| {
                let lo = start + i as f64;
                Bin {
                    start: lo,
                    end: lo + 1.0,
                    count: if i == num_bins / 2 { sorted.len() } else { 0 },
                }
            })
            .collect();
    }

    let num_bins = match binning {
        Binning::Fixed(n) => n.max(1),
        Binning::Auto => {
            let n = sorted.len() as f64;
            let iqr = quantile_sorted(&sorted, 0.75).unwrap_or(max)
                - quantile_sorted(&sorted, 0.25).unwrap_or(min);
            let width = if iqr > 0.0 {
                2.0 * iqr / n.cbrt()
            } else {
                (max - min) / n.sqrt()
            };
            (((max - min) / width).ceil() as usize).clamp(MIN_AUTO_BINS, MAX_AUTO_BINS)
        }
    };

    let width = (max - min) / num_bins as f64;
    let mut counts = vec![0usize; num_bins];
    for &v in &sorted {
        let idx = (((v - min) / width).floor() as usize).min(num_bins - 1);
        if let Some(slot) = counts.get_mut(idx) {
            *slot += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` positions over `[min, max]` of the data and scaled to histogram
/// counts for a bin width of `bin_width`.
///
/// Returns an empty curve when the data has no spread.
pub fn density_curve(values: &[f64], points: usize, bin_width: f64) -> Vec<(f64, f64)> {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = data.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return Vec::new();
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    (0..points)
        .map(|i| {
            let x = min + (max - min) * i as f64 / (points - 1) as f64;
            let density: f64 = data
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}

/// Pearson correlation over rows where both values are present.
/// `None` when fewer than two pairs exist or either side has no variance.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise correlations, rows and columns in input order.
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<Option<f64>>> {
    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

/// Drops rows missing either value, groups by timestamp and sums each group.
/// Output is in ascending time order.
pub fn sum_by_time(times: &[Option<i64>], values: &[Option<f64>]) -> Vec<(i64, f64)> {
    let mut groups: BTreeMap<i64, f64> = BTreeMap::new();
    for (t, v) in times.iter().zip(values) {
        if let (Some(t), Some(v)) = (t, v) {
            *groups.entry(*t).or_insert(0.0) += v;
        }
    }
    groups.into_iter().collect()
}

/// Diverging blue-white-red colour for a value in `[-1, 1]`.
pub fn diverging_color(value: f64) -> (u8, u8, u8) {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    let t = value.clamp(-1.0, 1.0);
    let (from, to, w) = if t < 0.0 {
        (MID, COLD, -t)
    } else {
        (MID, WARM, t)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * w).round() as u8;
    (lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}
