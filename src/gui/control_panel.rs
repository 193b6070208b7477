//! Control Panel Widget
//! Left sidebar: view selection, PNG export and status line.

use crate::charts::ChartKind;
use egui::{Color32, RichText};

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Select(ChartKind),
    ExportPng,
}

/// Sidebar with five mutually exclusive views.
pub struct ControlPanel {
    pub selected: ChartKind,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selected: ChartKind::MortalityRates,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Child Mortality Dashboard")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.label(RichText::new("Select a visualization").size(14.0).strong());
        ui.add_space(5.0);

        for kind in ChartKind::ALL {
            if ui
                .radio_value(&mut self.selected, kind, kind.label())
                .changed()
            {
                action = ControlPanelAction::Select(kind);
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            if ui
                .add_sized([200.0, 30.0], egui::Button::new("🖼 Export PNG"))
                .clicked()
            {
                action = ControlPanelAction::ExportPng;
            }
        });

        ui.add_space(10.0);
        ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));

        action
    }
}
