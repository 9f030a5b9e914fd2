//! Charts module - plot data preparation and PNG rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, DENSITY_POINTS, HISTOGRAM_BINS};
pub use renderer::{ChartRenderer, RenderError};
