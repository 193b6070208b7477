//! Child Mortality Dashboard
//!
//! Loads public-health CSV datasets with Polars, prepares five chart tables
//! and shows them one at a time behind a sidebar.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;

pub use charts::{ChartData, ChartKind};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PipelineError};
