//! Chart Viewer Widget
//! Central panel showing exactly one prepared chart at a time.

use crate::charts::{ChartData, ChartKind, ChartPlotter};
use egui::{Color32, RichText, ScrollArea};
use std::collections::HashMap;

const INSIGHTS: &str = "This dashboard presents visualizations on child and infant mortality rates, \
causes of death, healthcare access, and other key factors that impact child health.";

const NEXT_STEPS: [&str; 2] = [
    "Explore actionable recommendations for addressing gaps in healthcare and vaccination coverage.",
    "Develop predictive models to identify high-risk regions and populations.",
];

/// Prepared charts by view. Failures are kept as messages so they are not retried every frame.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: HashMap<ChartKind, Result<ChartData, String>>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, kind: ChartKind) -> bool {
        self.charts.contains_key(&kind)
    }

    pub fn insert(&mut self, kind: ChartKind, chart: Result<ChartData, String>) {
        self.charts.insert(kind, chart);
    }

    /// The prepared chart for `kind`, if it succeeded.
    pub fn chart(&self, kind: ChartKind) -> Option<&ChartData> {
        self.charts.get(&kind).and_then(|c| c.as_ref().ok())
    }

    /// Status line text for a view that has already been prepared.
    pub fn status(&self, kind: ChartKind) -> Option<String> {
        self.charts.get(&kind).map(|result| match result {
            Ok(chart) => format!("{} items shown", chart.len()),
            Err(_) => "Error preparing chart".to_string(),
        })
    }

    pub fn show(&self, ui: &mut egui::Ui, kind: ChartKind) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(kind.title()).size(20.0).strong());
                ui.add_space(10.0);

                match self.charts.get(&kind) {
                    Some(Ok(chart)) if chart.is_empty() => {
                        ui.label(RichText::new("No rows matched for this view").size(14.0));
                    }
                    Some(Ok(chart)) => ChartPlotter::draw_chart(ui, chart),
                    Some(Err(message)) => {
                        ui.label(
                            RichText::new(format!("Could not prepare chart: {}", message))
                                .size(14.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                    None => {
                        ui.label(RichText::new("No Data").size(14.0));
                    }
                }

                ui.add_space(20.0);
                ui.separator();
                ui.label(RichText::new("Insights:").size(16.0).strong());
                ui.label(INSIGHTS);
                ui.add_space(8.0);
                ui.label(RichText::new("Next Steps:").size(14.0).strong());
                for step in NEXT_STEPS {
                    ui.label(format!("• {}", step));
                }
            });
    }
}
