//! Child Mortality Dashboard - public-health CSV datasets as sidebar-navigated charts.

use anyhow::{anyhow, Context};
use eframe::egui;
use log::info;
use mortality_dashboard::gui::DashboardApp;
use mortality_dashboard::{Dashboard, DashboardConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config =
        DashboardConfig::builtin().context("Failed to parse the built-in dashboard configuration")?;
    // Datasets are read from the working directory.
    let dashboard = Dashboard::new(".", config);
    info!("Starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Child Mortality Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Child Mortality Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, dashboard)))),
    )
    .map_err(|e| anyhow!("{}", e))
}
