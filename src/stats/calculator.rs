//! Statistics Calculator Module
//! Handles descriptive statistics, per-class means and confidence intervals.

use crate::data::{DataProcessor, ProcessorError};
use polars::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::BTreeMap;
use thiserror::Error;

/// Row labels of the descriptive statistics table.
pub const SUMMARY_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{0}")]
    ColumnNotFound(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

impl From<ProcessorError> for StatsError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::ColumnNotFound(name) => StatsError::ColumnNotFound(name),
            ProcessorError::PolarsError(e) => StatsError::PolarsError(e),
        }
    }
}

/// Descriptive statistics for a single numeric column.
#[derive(Debug, Clone)]
pub struct SummaryStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl SummaryStats {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Values in `SUMMARY_LABELS` order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Per-class arithmetic means of the numeric columns, keyed in ascending class order.
#[derive(Debug, Clone)]
pub struct GroupedMeans {
    pub class_column: String,
    pub columns: Vec<String>,
    pub groups: BTreeMap<i64, Vec<f64>>,
}

impl GroupedMeans {
    pub fn classes(&self) -> Vec<i64> {
        self.groups.keys().copied().collect()
    }

    /// Mean of `column` within `class`, if both exist.
    pub fn mean(&self, class: i64, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.groups.get(&class).map(|means| means[idx])
    }

    /// Build a display frame: one row per class, one column per feature.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new(
            self.class_column.as_str().into(),
            self.classes(),
        ));
        for (idx, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.groups.values().map(|means| means[idx]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        DataFrame::new(columns)
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> SummaryStats {
        let n = values.len();
        if n == 0 {
            return SummaryStats::empty(column);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;

        // Sample standard deviation is undefined for a single value
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        SummaryStats {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Arithmetic mean, `NaN` for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }

    /// Two-sided Student-t confidence interval for the mean.
    ///
    /// Returns `None` when fewer than two values are available.
    pub fn mean_confidence_interval(values: &[f64], level: f64) -> Option<(f64, f64)> {
        let n = values.len();
        if n < 2 {
            return None;
        }

        let mean = Self::mean(values);
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let se = (variance / n as f64).sqrt();
        if se == 0.0 {
            return Some((mean, mean));
        }

        let dist = StudentsT::new(0.0, 1.0, (n - 1) as f64).ok()?;
        let t = dist.inverse_cdf(0.5 + level / 2.0);
        Some((mean - t * se, mean + t * se))
    }

    /// Descriptive statistics for each named column, over all non-null cells.
    pub fn summarize(df: &DataFrame, columns: &[&str]) -> Result<Vec<SummaryStats>, StatsError> {
        columns
            .iter()
            .map(|name| {
                let values = DataProcessor::present_values(df, name)?;
                Ok(Self::compute_descriptive_stats(name, &values))
            })
            .collect()
    }

    /// Arrange summary records as a display frame (one row per statistic).
    pub fn summary_frame(stats: &[SummaryStats]) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(stats.len() + 1);
        columns.push(Column::new("statistic".into(), SUMMARY_LABELS.to_vec()));
        for s in stats {
            columns.push(Column::new(s.column.as_str().into(), s.as_row().to_vec()));
        }
        DataFrame::new(columns)
    }

    /// Partition rows by class and average each column within each partition.
    ///
    /// Rows with a null class belong to no group; null cells are skipped.
    pub fn grouped_means(
        df: &DataFrame,
        class_column: &str,
        columns: &[&str],
    ) -> Result<GroupedMeans, StatsError> {
        DataProcessor::require_columns(df, &[class_column])?;
        DataProcessor::require_columns(df, columns)?;

        let aggs: Vec<Expr> = columns
            .iter()
            .map(|c| col(*c).cast(DataType::Float64).mean())
            .collect();

        let means_df = df
            .clone()
            .lazy()
            .filter(col(class_column).is_not_null())
            .group_by([col(class_column).cast(DataType::Int64)])
            .agg(aggs)
            .sort_by_exprs(vec![col(class_column)], SortMultipleOptions::default())
            .collect()?;

        let labels: Vec<Option<i64>> = means_df
            .column(class_column)?
            .i64()?
            .into_iter()
            .collect();
        let mut groups: BTreeMap<i64, Vec<f64>> = labels
            .iter()
            .flatten()
            .map(|label| (*label, Vec::with_capacity(columns.len())))
            .collect();

        for name in columns {
            let means = means_df.column(name)?.cast(&DataType::Float64)?;
            for (label, mean) in labels.iter().zip(means.f64()?.into_iter()) {
                if let Some(group) = label.and_then(|l| groups.get_mut(&l)) {
                    group.push(mean.unwrap_or(f64::NAN));
                }
            }
        }

        Ok(GroupedMeans {
            class_column: class_column.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            groups,
        })
    }

    /// Non-null values of `value_column` for rows labelled `class`.
    pub fn get_values_for_class(
        df: &DataFrame,
        class_column: &str,
        class: i64,
        value_column: &str,
    ) -> Result<Vec<f64>, StatsError> {
        DataProcessor::require_columns(df, &[class_column, value_column])?;

        let filtered = df
            .clone()
            .lazy()
            .filter(col(class_column).eq(lit(class)))
            .select([col(value_column).cast(DataType::Float64)])
            .collect()?;

        Ok(filtered
            .column(value_column)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }
}
