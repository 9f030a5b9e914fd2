//! Static Chart Renderer
//! Draws the four exploratory charts to PNG files with plotters.
//!
//! Charts, in render order:
//! 1. Line chart of Alcohol by row index
//! 2. Bar chart of mean Alcohol per class (with 95% CI error bars)
//! 3. Histogram of Alcohol (30 bins) with a density overlay
//! 4. Scatter plot of Alcohol vs Color_Intensity

use crate::charts::{ChartPlotter, DENSITY_POINTS, HISTOGRAM_BINS};
use crate::data::{DataProcessor, ProcessorError, CLASS_COLUMN};
use crate::stats::StatsError;
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use thiserror::Error;

const VALUE_COLUMN: &str = "Alcohol";
const SCATTER_Y_COLUMN: &str = "Color_Intensity";

// Colors
const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const DENSITY_COLOR: RGBColor = RGBColor(214, 39, 40);
const ERROR_BAR_COLOR: RGBColor = RGBColor(60, 60, 60);

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{0}")]
    ColumnNotFound(String),
    #[error("No values to plot in column '{0}'")]
    NoData(String),
    #[error("Failed to draw chart: {0}")]
    Plot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] polars::prelude::PolarsError),
}

impl From<ProcessorError> for RenderError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::ColumnNotFound(name) => RenderError::ColumnNotFound(name),
            ProcessorError::PolarsError(e) => RenderError::PolarsError(e),
        }
    }
}

impl From<StatsError> for RenderError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::ColumnNotFound(name) => RenderError::ColumnNotFound(name),
            StatsError::PolarsError(e) => RenderError::PolarsError(e),
        }
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Plot(err.to_string())
}

/// Renders the exploratory charts as PNG images into an output directory.
pub struct ChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    bins: usize,
    open_charts: bool,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            width: 1000,
            height: 600,
            bins: HISTOGRAM_BINS,
            open_charts: false,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Open each chart with the system image viewer after writing it.
    pub fn open_charts(mut self, open: bool) -> Self {
        self.open_charts = open;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render all four charts in order, stopping at the first failure.
    ///
    /// Charts written before the failure stay on disk.
    pub fn render_all(&self, df: &DataFrame) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;
        log::info!("Rendering charts into {}", self.output_dir().display());

        let charts: [fn(&Self, &DataFrame) -> Result<PathBuf, RenderError>; 4] = [
            Self::render_line_chart,
            Self::render_bar_chart,
            Self::render_histogram,
            Self::render_scatter_plot,
        ];

        let mut written = Vec::with_capacity(charts.len());
        for render in charts {
            let path = render(self, df)?;
            self.show(&path);
            written.push(path);
        }
        Ok(written)
    }

    /// Create `file_name` in the output directory, clear it and hand the
    /// drawing area to `draw`.
    fn draw_png<F>(&self, file_name: &str, draw: F) -> Result<PathBuf, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let path = self.output_dir.join(file_name);
        {
            let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;
            draw(&root)?;
            root.present().map_err(plot_err)?;
        }
        Ok(path)
    }

    fn show(&self, path: &Path) {
        log::info!("Chart written to {}", path.display());
        if self.open_charts {
            if let Err(e) = open::that(path) {
                log::warn!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    /// Alcohol plotted against row position.
    pub fn render_line_chart(&self, df: &DataFrame) -> Result<PathBuf, RenderError> {
        let points = ChartPlotter::line_series(df, VALUE_COLUMN)?;
        let (y_lo, y_hi) = ChartPlotter::padded_range(points.iter().map(|p| p.1))
            .ok_or_else(|| RenderError::NoData(VALUE_COLUMN.to_string()))?;
        let x_hi = df.height().saturating_sub(1).max(1) as f64;

        self.draw_png("line_chart.png", |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Line Chart: Alcohol Content by Index", CAPTION_FONT)
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(60)
                .build_cartesian_2d(0f64..x_hi, y_lo..y_hi)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc("Index")
                .y_desc("Alcohol")
                .draw()
                .map_err(plot_err)?;

            chart
                .draw_series(LineSeries::new(points, SERIES_COLOR.stroke_width(2)))
                .map_err(plot_err)?;
            Ok(())
        })
    }

    /// Mean Alcohol per class, one bar per class.
    pub fn render_bar_chart(&self, df: &DataFrame) -> Result<PathBuf, RenderError> {
        let bars = ChartPlotter::class_bars(df, CLASS_COLUMN, VALUE_COLUMN)?;
        if bars.is_empty() {
            return Err(RenderError::NoData(VALUE_COLUMN.to_string()));
        }

        let top = bars
            .iter()
            .map(|b| b.interval.map_or(b.mean, |(_, hi)| hi))
            .fold(0.0f64, f64::max);
        let y_hi = if top > 0.0 { top * 1.1 } else { 1.0 };
        let n = bars.len() as f64;
        let labels: Vec<String> = bars.iter().map(|b| b.class.to_string()).collect();

        self.draw_png("bar_chart.png", |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Bar Chart: Average Alcohol Content by Class", CAPTION_FONT)
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(60)
                .build_cartesian_2d(-0.5f64..n - 0.5, 0f64..y_hi)
                .map_err(plot_err)?;

            // Only integer ticks carry a class label
            let label_for = |x: &f64| {
                let idx = x.round();
                if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(bars.len() * 2 + 1)
                .x_label_formatter(&label_for)
                .x_desc("Class")
                .y_desc("Alcohol")
                .draw()
                .map_err(plot_err)?;

            chart
                .draw_series(bars.iter().enumerate().map(|(i, bar)| {
                    let x = i as f64;
                    Rectangle::new(
                        [(x - 0.4, 0.0), (x + 0.4, bar.mean)],
                        SERIES_COLOR.mix(0.8).filled(),
                    )
                }))
                .map_err(plot_err)?;

            chart
                .draw_series(bars.iter().enumerate().filter_map(|(i, bar)| {
                    let (lo, hi) = bar.interval?;
                    Some(ErrorBar::new_vertical(
                        i as f64,
                        lo,
                        bar.mean,
                        hi,
                        ERROR_BAR_COLOR.stroke_width(2),
                        12,
                    ))
                }))
                .map_err(plot_err)?;
            Ok(())
        })
    }

    /// Alcohol distribution with a density curve scaled to bin counts.
    pub fn render_histogram(&self, df: &DataFrame) -> Result<PathBuf, RenderError> {
        let values = DataProcessor::present_values(df, VALUE_COLUMN)?;
        let histogram = ChartPlotter::histogram(&values, self.bins)
            .ok_or_else(|| RenderError::NoData(VALUE_COLUMN.to_string()))?;

        let x_lo = histogram.edges[0];
        let x_hi = histogram.edges[histogram.edges.len() - 1];
        let scale = values.len() as f64 * histogram.bin_width();
        let density = ChartPlotter::density_curve(&values, x_lo, x_hi, DENSITY_POINTS, scale);

        let peak = density
            .iter()
            .map(|p| p.1)
            .fold(histogram.max_count() as f64, f64::max);
        let y_hi = if peak > 0.0 { peak * 1.1 } else { 1.0 };

        self.draw_png("histogram.png", |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Histogram: Distribution of Alcohol Content", CAPTION_FONT)
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(60)
                .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc("Alcohol")
                .y_desc("Frequency")
                .draw()
                .map_err(plot_err)?;

            chart
                .draw_series(histogram.bins().map(|(lo, hi, count)| {
                    Rectangle::new([(lo, 0.0), (hi, count as f64)], SERIES_COLOR.mix(0.6).filled())
                }))
                .map_err(plot_err)?;

            if !density.is_empty() {
                chart
                    .draw_series(LineSeries::new(density, DENSITY_COLOR.stroke_width(2)))
                    .map_err(plot_err)?;
            }
            Ok(())
        })
    }

    /// Alcohol (x) against Color_Intensity (y).
    pub fn render_scatter_plot(&self, df: &DataFrame) -> Result<PathBuf, RenderError> {
        let points = ChartPlotter::scatter_points(df, VALUE_COLUMN, SCATTER_Y_COLUMN)?;
        let (x_lo, x_hi) = ChartPlotter::padded_range(points.iter().map(|p| p.0))
            .ok_or_else(|| RenderError::NoData(VALUE_COLUMN.to_string()))?;
        let (y_lo, y_hi) = ChartPlotter::padded_range(points.iter().map(|p| p.1))
            .ok_or_else(|| RenderError::NoData(SCATTER_Y_COLUMN.to_string()))?;

        self.draw_png("scatter_plot.png", |root| {
            let mut chart = ChartBuilder::on(root)
                .caption("Scatter Plot: Alcohol vs Color Intensity", CAPTION_FONT)
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(60)
                .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
                .map_err(plot_err)?;

            chart
                .configure_mesh()
                .x_desc("Alcohol")
                .y_desc("Color Intensity")
                .draw()
                .map_err(plot_err)?;

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, SERIES_COLOR.mix(0.8).filled())),
                )
                .map_err(plot_err)?;
            Ok(())
        })
    }
}
