//! Dashboard Main Application
//! Sidebar navigation with one chart view; charts are prepared when first selected.

use crate::charts::{ChartKind, StaticChartRenderer};
use crate::dashboard::Dashboard;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::{error, info, warn};

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 900;

/// Main application window.
pub struct DashboardApp {
    dashboard: Dashboard,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dashboard: Dashboard) -> Self {
        let mut app = Self {
            dashboard,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.ensure_prepared(app.control_panel.selected);
        app
    }

    /// Run the view's pipeline unless it already ran, then refresh the status line.
    fn ensure_prepared(&mut self, kind: ChartKind) {
        if !self.chart_viewer.contains(kind) {
            let result = self.dashboard.prepare(kind).map_err(|e| {
                error!("Failed to prepare '{}': {}", kind.label(), e);
                e.to_string()
            });
            self.chart_viewer.insert(kind, result);
        }

        if let Some(status) = self.chart_viewer.status(kind) {
            self.control_panel.set_status(&status);
        }
    }

    /// Render the selected chart to a PNG and open it.
    fn handle_export_png(&mut self) {
        let kind = self.control_panel.selected;
        let Some(chart) = self.chart_viewer.chart(kind) else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let file_name = format!("{}.png", kind.label().to_lowercase().replace(' ', "_"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::render_png(chart, &path, EXPORT_WIDTH, EXPORT_HEIGHT) {
            Ok(()) => {
                info!("Exported '{}' to {}", kind.label(), path.display());
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                if let Err(e) = open::that(&path) {
                    warn!("Could not open {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                error!("Export of '{}' failed: {}", kind.label(), e);
                self.control_panel
                    .set_status(&format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                let action = self.control_panel.show(ui);

                match action {
                    ControlPanelAction::Select(kind) => self.ensure_prepared(kind),
                    ControlPanelAction::ExportPng => self.handle_export_png(),
                    ControlPanelAction::None => {}
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.control_panel.selected);
        });
    }
}
