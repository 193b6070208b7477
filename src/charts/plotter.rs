//! Chart Plotter Module
//! Draws the interactive view of each prepared chart with egui_plot.

use crate::charts::pipeline::{ordered_unique, CauseBar, ChartData, ChartSeries, RegionPoint};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Category palette (bars by cause, points by region)
pub const PALETTE: [Color32; 9] = [
    Color32::from_rgb(228, 26, 28),   // Red
    Color32::from_rgb(55, 126, 184),  // Blue
    Color32::from_rgb(77, 175, 74),   // Green
    Color32::from_rgb(152, 78, 163),  // Purple
    Color32::from_rgb(255, 127, 0),   // Orange
    Color32::from_rgb(255, 255, 51),  // Yellow
    Color32::from_rgb(166, 86, 40),   // Brown
    Color32::from_rgb(247, 129, 191), // Pink
    Color32::from_rgb(153, 153, 153), // Grey
];

// Ends of the sequential "Reds" scale
const REDS_LOW: (f64, f64, f64) = (254.0, 229.0, 217.0);
const REDS_HIGH: (f64, f64, f64) = (165.0, 15.0, 21.0);

const CHART_HEIGHT: f32 = 520.0;

/// Creates the interactive dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn category_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Colour for `t` in [0, 1] on the Reds scale.
    pub fn reds(t: f64) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |low: f64, high: f64| (low + (high - low) * t).round() as u8;
        Color32::from_rgb(
            mix(REDS_LOW.0, REDS_HIGH.0),
            mix(REDS_LOW.1, REDS_HIGH.1),
            mix(REDS_LOW.2, REDS_HIGH.2),
        )
    }

    /// Position of `value` between `min` and `max`, 0.0 when the range is empty.
    pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
        if max > min {
            (value - min) / (max - min)
        } else {
            0.0
        }
    }

    /// Stack offsets for the cause bars, one per bar in row order.
    pub fn stack_offsets(bars: &[CauseBar], locations: &[String]) -> Vec<f64> {
        let mut heights = vec![0.0; locations.len()];
        bars.iter()
            .map(|bar| {
                let slot = locations
                    .iter()
                    .position(|l| l == &bar.location)
                    .unwrap_or(0);
                let offset = heights[slot];
                heights[slot] += bar.value;
                offset
            })
            .collect()
    }

    /// Draw whichever chart `chart` holds.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
        match &chart.series {
            ChartSeries::Line(points) => Self::draw_line_chart(ui, chart, points),
            ChartSeries::Ranking(rows) => Self::draw_ranking_chart(ui, chart, rows),
            ChartSeries::Causes(bars) => Self::draw_causes_chart(ui, chart, bars),
            ChartSeries::Scatter(points) => Self::draw_scatter_chart(ui, chart, points),
        }
    }

    fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartData, points: &[[f64; 2]]) {
        let kind = chart.kind;
        Plot::new(format!("line_{:?}", kind))
            .height(CHART_HEIGHT)
            .x_axis_label(kind.x_label())
            .y_axis_label(kind.y_label())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(points.to_vec()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name(kind.y_label()),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points.to_vec()))
                        .radius(3.0)
                        .color(LINE_COLOR),
                );
            });
    }

    /// Countries as horizontal bars, highest rate on top, shaded on the Reds scale.
    fn draw_ranking_chart(ui: &mut egui::Ui, chart: &ChartData, rows: &[(String, f64)]) {
        let kind = chart.kind;
        let n = rows.len();
        let min = rows.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
        let max = rows.iter().map(|r| r.1).fold(f64::NEG_INFINITY, f64::max);

        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, (country, rate))| {
                Bar::new((n - 1 - i) as f64, *rate)
                    .width(0.8)
                    .name(country)
                    .fill(Self::reds(Self::normalize(*rate, min, max)))
            })
            .collect();

        let labels: Vec<String> = rows.iter().rev().map(|r| r.0.clone()).collect();

        Plot::new(format!("ranking_{:?}", kind))
            .height(CHART_HEIGHT.max(n as f32 * 14.0))
            .x_axis_label(kind.x_label())
            .y_axis_label(kind.y_label())
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(kind.x_label()));
            });
    }

    /// Leading cause per age group, stacked per country and coloured by cause.
    fn draw_causes_chart(ui: &mut egui::Ui, chart: &ChartData, bars: &[CauseBar]) {
        let kind = chart.kind;
        let locations = ordered_unique(bars.iter().map(|b| b.location.as_str()));
        let causes = ordered_unique(bars.iter().map(|b| b.cause.as_str()));
        let offsets = Self::stack_offsets(bars, &locations);

        let charts: Vec<BarChart> = causes
            .iter()
            .enumerate()
            .map(|(ci, cause)| {
                let cause_bars: Vec<Bar> = bars
                    .iter()
                    .zip(offsets.iter())
                    .filter(|(bar, _)| &bar.cause == cause)
                    .filter_map(|(bar, &offset)| {
                        let x = locations.iter().position(|l| l == &bar.location)?;
                        Some(
                            Bar::new(x as f64, bar.value)
                                .base_offset(offset)
                                .width(0.6)
                                .name(format!("{} ({})", bar.location, bar.age_group)),
                        )
                    })
                    .collect();
                BarChart::new(cause_bars)
                    .name(cause)
                    .color(Self::category_color(ci))
            })
            .collect();

        Plot::new(format!("causes_{:?}", kind))
            .height(CHART_HEIGHT)
            .x_axis_label(kind.x_label())
            .y_axis_label(kind.y_label())
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                    locations.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for bar_chart in charts {
                    plot_ui.bar_chart(bar_chart);
                }
            });
    }

    fn draw_scatter_chart(ui: &mut egui::Ui, chart: &ChartData, points: &[RegionPoint]) {
        let kind = chart.kind;
        let regions = ordered_unique(points.iter().map(|p| p.region.as_str()));

        Plot::new(format!("scatter_{:?}", kind))
            .height(CHART_HEIGHT)
            .x_axis_label(kind.x_label())
            .y_axis_label(kind.y_label())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (ri, region) in regions.iter().enumerate() {
                    let region_points: Vec<[f64; 2]> = points
                        .iter()
                        .filter(|p| &p.region == region)
                        .map(|p| [p.attended, p.mortality])
                        .collect();
                    plot_ui.points(
                        Points::new(PlotPoints::from(region_points))
                            .radius(6.0)
                            .color(Self::category_color(ri))
                            .name(region),
                    );
                }
            });
    }
}
