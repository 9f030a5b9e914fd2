//! Wine Explorer - Archive Loading, Descriptive Statistics & Chart Export
//!
//! Loads the wine dataset from a ZIP archive, prints exploratory statistics
//! and writes four charts.

mod app;
mod charts;
mod config;
mod data;
mod report;
mod stats;

use anyhow::Context;
use app::ExplorerApp;
use config::{AppConfig, CONFIG_FILE};
use std::path::Path;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    report::configure_display();

    let config = AppConfig::load(Path::new(CONFIG_FILE))
        .with_context(|| format!("could not load {}", CONFIG_FILE))?;
    log::debug!("Using config: {:?}", config);

    Ok(ExplorerApp::new(config).run())
}
