//! Static Chart Renderer
//! Renders a prepared chart to a PNG file with plotters.
//!
//! Layout follows the interactive view: title on top, axis descriptions from
//! the chart kind, category legend in the upper right where one applies.

use crate::charts::pipeline::{ordered_unique, CauseBar, ChartData, ChartSeries, RegionPoint};
use crate::charts::plotter::{ChartPlotter, LINE_COLOR};
use egui::Color32;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` to a PNG at `path`.
    pub fn render_png(
        chart: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), Box<dyn Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        match &chart.series {
            ChartSeries::Line(points) => Self::draw_line(&root, chart, points)?,
            ChartSeries::Ranking(rows) => Self::draw_ranking(&root, chart, rows)?,
            ChartSeries::Causes(bars) => Self::draw_causes(&root, chart, bars)?,
            ChartSeries::Scatter(points) => Self::draw_scatter(&root, chart, points)?,
        }

        root.present()?;
        Ok(())
    }

    fn draw_line(root: &Canvas<'_>, chart: &ChartData, points: &[[f64; 2]]) -> Result<(), Box<dyn Error>> {
        let kind = chart.kind;
        let x_range = Self::padded_range(points.iter().map(|p| p[0]), 0.0);
        let y_range = Self::padded_range(points.iter().map(|p| p[1]), 0.05);
        let color = Self::rgb(LINE_COLOR);

        let mut ctx = ChartBuilder::on(root)
            .caption(kind.title(), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        ctx.configure_mesh()
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .label_style(("sans-serif", 13))
            .draw()?;

        ctx.draw_series(LineSeries::new(
            points.iter().map(|p| (p[0], p[1])),
            color.stroke_width(2),
        ))?;
        ctx.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
        )?;
        Ok(())
    }

    fn draw_ranking(
        root: &Canvas<'_>,
        chart: &ChartData,
        rows: &[(String, f64)],
    ) -> Result<(), Box<dyn Error>> {
        let kind = chart.kind;
        let n = rows.len().max(1);
        let min = rows.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
        let max = rows.iter().map(|r| r.1).fold(f64::NEG_INFINITY, f64::max);
        let x_max = if max.is_finite() && max > 0.0 { max * 1.1 } else { 1.0 };

        let mut ctx = ChartBuilder::on(root)
            .caption(kind.title(), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(170)
            .build_cartesian_2d(0.0..x_max, 0.0..n as f64)?;

        // Row i sits in the band [n - 1 - i, n - i).
        let label_for = |y: &f64| {
            let band = y.floor();
            if band < 0.0 || (y - band - 0.5).abs() > 1e-6 {
                return String::new();
            }
            let i = n as f64 - 1.0 - band;
            rows.get(i as usize).map(|r| r.0.clone()).unwrap_or_default()
        };
        ctx.configure_mesh()
            .disable_y_mesh()
            .x_desc(kind.x_label())
            .y_labels(n * 2 + 1)
            .y_label_formatter(&label_for)
            .label_style(("sans-serif", 13))
            .draw()?;

        ctx.draw_series(rows.iter().enumerate().map(|(i, (_, rate))| {
            let top = (n - i) as f64 - 0.1;
            let bottom = (n - 1 - i) as f64 + 0.1;
            let shade = Self::rgb(ChartPlotter::reds(ChartPlotter::normalize(*rate, min, max)));
            Rectangle::new([(0.0, bottom), (*rate, top)], shade.filled())
        }))?;
        Ok(())
    }

    fn draw_causes(root: &Canvas<'_>, chart: &ChartData, bars: &[CauseBar]) -> Result<(), Box<dyn Error>> {
        let kind = chart.kind;
        let locations = ordered_unique(bars.iter().map(|b| b.location.as_str()));
        let causes = ordered_unique(bars.iter().map(|b| b.cause.as_str()));
        let offsets = ChartPlotter::stack_offsets(bars, &locations);
        let top = bars
            .iter()
            .zip(offsets.iter())
            .map(|(b, o)| b.value + o)
            .fold(0.0, f64::max);
        let y_max = if top > 0.0 { top * 1.1 } else { 1.0 };

        let mut ctx = ChartBuilder::on(root)
            .caption(kind.title(), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(110)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..locations.len().max(1) as f64, 0.0..y_max)?;

        let label_for = |x: &f64| {
            let slot = x.floor();
            if slot < 0.0 || (x - slot - 0.5).abs() > 1e-6 {
                return String::new();
            }
            locations.get(slot as usize).cloned().unwrap_or_default()
        };
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .x_labels(locations.len() * 2 + 1)
            .x_label_formatter(&label_for)
            .x_label_style(
                ("sans-serif", 11)
                    .into_font()
                    .transform(FontTransform::Rotate270),
            )
            .draw()?;

        for (ci, cause) in causes.iter().enumerate() {
            let color = Self::rgb(ChartPlotter::category_color(ci));
            let rects: Vec<Rectangle<(f64, f64)>> = bars
                .iter()
                .zip(offsets.iter())
                .filter(|(bar, _)| &bar.cause == cause)
                .filter_map(|(bar, &offset)| {
                    let x = locations.iter().position(|l| l == &bar.location)? as f64;
                    Some(Rectangle::new(
                        [(x + 0.2, offset), (x + 0.8, offset + bar.value)],
                        color.filled(),
                    ))
                })
                .collect();

            ctx.draw_series(rects)?
                .label(cause.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_scatter(
        root: &Canvas<'_>,
        chart: &ChartData,
        points: &[RegionPoint],
    ) -> Result<(), Box<dyn Error>> {
        let kind = chart.kind;
        let regions = ordered_unique(points.iter().map(|p| p.region.as_str()));
        let x_range = Self::padded_range(points.iter().map(|p| p.attended), 0.05);
        let y_range = Self::padded_range(points.iter().map(|p| p.mortality), 0.05);

        let mut ctx = ChartBuilder::on(root)
            .caption(kind.title(), ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        ctx.configure_mesh()
            .x_desc(kind.x_label())
            .y_desc(kind.y_label())
            .label_style(("sans-serif", 13))
            .draw()?;

        for (ri, region) in regions.iter().enumerate() {
            let color = Self::rgb(ChartPlotter::category_color(ri));
            ctx.draw_series(
                points
                    .iter()
                    .filter(|p| &p.region == region)
                    .map(|p| Circle::new((p.attended, p.mortality), 6, color.filled())),
            )?
            .label(region.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }

    fn rgb(color: Color32) -> RGBColor {
        RGBColor(color.r(), color.g(), color.b())
    }

    /// Value range widened by `pad` of its span on both sides.
    pub fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> std::ops::Range<f64> {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return 0.0..1.0;
        }
        if max <= min {
            return (min - 1.0)..(max + 1.0);
        }
        let margin = (max - min) * pad;
        (min - margin)..(max + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_span() {
        let range = StaticChartRenderer::padded_range([0.0, 10.0].into_iter(), 0.1);
        assert_eq!(range, -1.0..11.0);
    }

    #[test]
    fn padded_range_of_single_value_or_nothing() {
        assert_eq!(StaticChartRenderer::padded_range([5.0].into_iter(), 0.1), 4.0..6.0);
        assert_eq!(StaticChartRenderer::padded_range(std::iter::empty(), 0.1), 0.0..1.0);
        assert_eq!(
            StaticChartRenderer::padded_range([f64::NAN].into_iter(), 0.1),
            0.0..1.0
        );
    }
}
