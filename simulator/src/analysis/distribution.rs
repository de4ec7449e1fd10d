use serde::{Deserialize, Serialize};

use crate::utils::logging::{self, AggregationType, OperationCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the data range; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub bin_width: f64,
}

impl Histogram {
    /// Returns `None` for empty input or zero bins.
    pub fn from_values(values: &[f64], bin_count: usize) -> Option<Self> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }
        let (mut lo, mut hi) = min_max(values);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let bin_width = (hi - lo) / bin_count as f64;

        let mut counts = vec![0usize; bin_count];
        for &value in values {
            let index = (((value - lo) / bin_width).floor() as usize).min(bin_count - 1);
            counts[index] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + i as f64 * bin_width,
                upper: if i + 1 == bin_count { hi } else { lo + (i + 1) as f64 * bin_width },
                count,
            })
            .collect();

        Some(Self { bins, bin_width })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Gaussian kernel density estimate with Scott's rule bandwidth.
#[derive(Debug, Clone)]
pub struct KernelDensity<'a> {
    values: &'a [f64],
    bandwidth: f64,
}

impl<'a> KernelDensity<'a> {
    /// Needs at least two values with non-zero spread.
    pub fn new(values: &'a [f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();
        if std_dev.is_nan() || std_dev <= 0.0 {
            return None;
        }
        Some(Self {
            values,
            bandwidth: std_dev * n.powf(-0.2),
        })
    }

    pub fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.values.len() as f64 * self.bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        let sum: f64 = self
            .values
            .iter()
            .map(|v| {
                let u = (x - v) / self.bandwidth;
                (-0.5 * u * u).exp()
            })
            .sum();
        norm * sum
    }

    /// Density evaluated on `points` evenly spaced positions across `[lo, hi]`.
    pub fn curve(&self, lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        if points < 2 {
            return vec![(lo, self.density(lo))];
        }
        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                (x, self.density(x))
            })
            .collect()
    }
}

/// Histogram plus a density curve scaled to histogram counts, ready to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub histogram: Histogram,
    /// `(x, expected count per bin)`; empty when no density can be estimated.
    pub density_overlay: Vec<(f64, f64)>,
}

pub fn summarize_distribution(values: &[f64], bin_count: usize, grid_points: usize) -> Option<DistributionSummary> {
    let _timing = logging::start_timing("summarize_distribution",
        OperationCategory::Aggregation { subcategory: AggregationType::Distribution });

    let histogram = Histogram::from_values(values, bin_count)?;
    let scale = values.len() as f64 * histogram.bin_width;
    let density_overlay = match KernelDensity::new(values) {
        Some(kde) => {
            let lo = histogram.bins.first().map(|b| b.lower).unwrap_or(0.0);
            let hi = histogram.bins.last().map(|b| b.upper).unwrap_or(1.0);
            kde.curve(lo, hi, grid_points)
                .into_iter()
                .map(|(x, d)| (x, d * scale))
                .collect()
        }
        None => Vec::new(),
    };

    Some(DistributionSummary { histogram, density_overlay })
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
