//! Wine Explorer Application
//! Runs the load, analysis and visualization stages in order.

use crate::charts::{ChartRenderer, RenderError};
use crate::config::AppConfig;
use crate::data::{
    ArchiveError, ArchiveReader, DataProcessor, LoaderError, ProcessorError, TableLoader,
    CLASS_COLUMN, FEATURE_COLUMNS,
};
use crate::report;
use crate::stats::{GroupedMeans, StatsCalculator, StatsError, SummaryStats};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Failure of the load stage; always ends the run.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Table(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] ProcessorError),
}

impl LoadError {
    /// One-line message shown to the user before exiting.
    pub fn user_message(&self, member: &str) -> String {
        match self {
            LoadError::Archive(ArchiveError::InvalidArchive(_)) => {
                "The file is not a valid ZIP file.".to_string()
            }
            LoadError::Archive(ArchiveError::ArchiveNotFound(_)) => {
                "The ZIP file was not found. Please ensure the file is in the correct directory."
                    .to_string()
            }
            LoadError::Archive(ArchiveError::MemberNotFound(_)) => {
                format!("The file '{}' was not found in the ZIP archive.", member)
            }
            other => format!("An error occurred: {}", other),
        }
    }
}

/// Results of the analysis stage.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub summary: Vec<SummaryStats>,
    pub grouped: GroupedMeans,
}

/// Main application: one pass over the configured dataset.
pub struct ExplorerApp {
    config: AppConfig,
}

impl ExplorerApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run every stage; non-zero exit only when loading fails.
    pub fn run(&self) -> ExitCode {
        match self.run_stages() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Load stage failed: {}", e);
                println!("{}", e.user_message(&self.config.member_name));
                ExitCode::FAILURE
            }
        }
    }

    /// Load, then analyze and render. Analysis and rendering failures are
    /// reported and swallowed.
    pub fn run_stages(&self) -> Result<(), LoadError> {
        let df = self.load_stage()?;

        if let Err(e) = self.analysis_stage(&df) {
            log::error!("Analysis stage failed: {}", e);
            match e {
                StatsError::ColumnNotFound(name) => println!("Column not found: {}", name),
                other => println!("An error occurred during analysis: {}", other),
            }
        }

        if let Err(e) = self.render_stage(&df) {
            log::error!("Visualization stage failed: {}", e);
            match e {
                RenderError::ColumnNotFound(name) => println!("Column not found: {}", name),
                other => println!("An error occurred during visualization: {}", other),
            }
        }

        Ok(())
    }

    /// Extract, parse, describe and forward-fill the table.
    pub fn load_stage(&self) -> Result<DataFrame, LoadError> {
        let reader = ArchiveReader::new(&self.config.archive_path);
        let member = reader.read_member(&self.config.member_name)?;
        println!("{}", report::format_listing(&member.listing));

        let mut df = TableLoader::load_member(&member)?;
        println!("{}", df.head(Some(self.config.head_rows)));
        println!("{}", report::format_info(&df));
        println!("{}", report::format_null_counts(&df));

        DataProcessor::forward_fill(&mut df)?;
        Ok(df)
    }

    /// Print descriptive statistics and per-class means.
    pub fn analysis_stage(&self, df: &DataFrame) -> Result<AnalysisReport, StatsError> {
        let summary = StatsCalculator::summarize(df, &FEATURE_COLUMNS)?;
        println!("{}", StatsCalculator::summary_frame(&summary)?);

        let grouped = StatsCalculator::grouped_means(df, CLASS_COLUMN, &FEATURE_COLUMNS)?;
        println!("Mean values by class:\n{}", grouped.to_frame()?);

        Ok(AnalysisReport { summary, grouped })
    }

    /// Write the four charts.
    pub fn render_stage(&self, df: &DataFrame) -> Result<Vec<PathBuf>, RenderError> {
        ChartRenderer::new(&self.config.output_dir)
            .with_size(self.config.chart_width, self.config.chart_height)
            .with_bins(self.config.histogram_bins)
            .open_charts(self.config.open_charts)
            .render_all(df)
    }
}
