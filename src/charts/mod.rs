//! Charts module - Chart pipelines and rendering

pub mod pipeline;
mod plotter;
mod renderer;

pub use pipeline::{CauseBar, ChartData, ChartKind, ChartSeries, RegionPoint};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
