//! Chart Plotter Module
//! Prepares plot-ready series (points, bars, bins, density curves) from the table.

use crate::data::{DataProcessor, ProcessorError};
use crate::stats::{StatsCalculator, StatsError};
use polars::prelude::DataFrame;
use statrs::distribution::{Continuous, Normal};

/// Number of bins used by the histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Number of evaluation points of the density curve.
pub const DENSITY_POINTS: usize = 200;

/// Confidence level of the bar chart error bars.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// One bar of the per-class bar chart.
#[derive(Debug, Clone)]
pub struct ClassBar {
    pub class: i64,
    pub count: usize,
    pub mean: f64,
    pub interval: Option<(f64, f64)>,
}

/// Equal-width histogram; `edges` has one more entry than `counts`.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => {
                (hi - lo) / self.counts.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(lower edge, upper edge, count)` for each bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

/// Builds plot series from DataFrame columns.
pub struct ChartPlotter;

impl ChartPlotter {
    /// `(row index, value)` pairs for a column; null cells are left out.
    pub fn line_series(
        df: &DataFrame,
        column: &str,
    ) -> Result<Vec<(f64, f64)>, ProcessorError> {
        Ok(DataProcessor::column_values(df, column)?
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect())
    }

    /// Mean of `value_column` per distinct class, ascending by class.
    pub fn class_bars(
        df: &DataFrame,
        class_column: &str,
        value_column: &str,
    ) -> Result<Vec<ClassBar>, StatsError> {
        let grouped = StatsCalculator::grouped_means(df, class_column, &[value_column])?;

        grouped
            .groups
            .iter()
            .map(|(&class, means)| {
                let values =
                    StatsCalculator::get_values_for_class(df, class_column, class, value_column)?;
                Ok(ClassBar {
                    class,
                    count: values.len(),
                    mean: means[0],
                    interval: StatsCalculator::mean_confidence_interval(&values, CONFIDENCE_LEVEL),
                })
            })
            .collect()
    }

    /// `(x, y)` pairs for rows where both columns hold a value.
    pub fn scatter_points(
        df: &DataFrame,
        x_column: &str,
        y_column: &str,
    ) -> Result<Vec<(f64, f64)>, ProcessorError> {
        let xs = DataProcessor::column_values(df, x_column)?;
        let ys = DataProcessor::column_values(df, y_column)?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect())
    }

    /// Bin values into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// The last bin is closed on the right. A constant sample is centred in a
    /// unit-wide range.
    pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
        if bins == 0 {
            return None;
        }
        let (mut lo, mut hi) = Self::value_range(values.iter().copied())?;
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    /// Gaussian kernel density estimate (Scott's rule bandwidth) on `points`
    /// evenly spaced positions across `[lo, hi]`, multiplied by `scale`.
    ///
    /// Empty when the sample has fewer than two values or no spread.
    pub fn density_curve(
        values: &[f64],
        lo: f64,
        hi: f64,
        points: usize,
        scale: f64,
    ) -> Vec<(f64, f64)> {
        let n = values.len();
        if n < 2 || points < 2 {
            return Vec::new();
        }

        let std = StatsCalculator::compute_descriptive_stats("", values).std;
        let bandwidth = std * (n as f64).powf(-0.2);
        let Ok(kernel) = Normal::new(0.0, bandwidth) else {
            return Vec::new();
        };

        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density = values.iter().map(|v| kernel.pdf(x - v)).sum::<f64>() / n as f64;
                (x, density * scale)
            })
            .collect()
    }

    /// Minimum and maximum of the finite values.
    pub fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Value range widened by 5% on each side (or by 1.0 for a constant sample).
    pub fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        let (lo, hi) = Self::value_range(values)?;
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        Some((lo - pad, hi + pad))
    }
}
