//! Plotters-powered dashboard chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::dashboard::{day_number, fmt_month, Chart, ChartKind};

/// A render-only view of one dashboard chart.
///
/// Bounds come from [`Chart::plot_bounds`]; the widget holds no state of its own.
pub struct DashboardChart<'a> {
    pub chart: &'a Chart,
}

impl Widget for DashboardChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let Some(((x0, x1), (y0, y1))) = self.chart.plot_bounds() else {
            return;
        };

        let chart = self.chart;
        let widget = widget_fn(move |root| {
            let mut cc = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            cc.configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_month(*v))
                .y_label_formatter(&|v| fmt_level(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let (r, g, b) = chart.color;
            let color = RGBColor(r, g, b);
            match chart.kind {
                ChartKind::Line => {
                    cc.draw_series(LineSeries::new(
                        chart.points.iter().map(|&(d, v)| (day_number(d), v)),
                        &color,
                    ))?;
                }
                ChartKind::Bar => {
                    // One vertical stroke per month; filled rectangles do not map
                    // cleanly onto terminal cells.
                    cc.draw_series(chart.points.iter().map(|&(d, v)| {
                        let x = day_number(d);
                        PathElement::new(vec![(x, 0.0), (x, v)], color)
                    }))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn fmt_level(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else {
        format!("{v:.1}")
    }
}
