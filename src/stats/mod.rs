//! Statistics module - descriptive statistics and grouped means

mod calculator;

pub use calculator::{GroupedMeans, StatsCalculator, StatsError, SummaryStats};
