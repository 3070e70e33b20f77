//! Formatted terminal output for the dashboard.
//!
//! We keep formatting code in one place so the fetch/transform code stays
//! clean and output changes are localized.

use crate::dashboard::{Body, Chart, Dashboard, MetricCard};
use crate::plot::render_ascii_chart;

/// Format the whole dashboard: title, banners, then cards + charts or the warning.
pub fn format_dashboard(dash: &Dashboard, plot: Option<(usize, usize)>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", dash.title));
    out.push_str(dash.subtitle);
    out.push('\n');

    for banner in &dash.banners {
        out.push_str(&format!("[error] {banner}\n"));
    }
    out.push('\n');

    match &dash.body {
        Body::Warning(text) => {
            out.push_str(&format!("[warning] {text}\n"));
        }
        Body::Ready(panels) => {
            out.push_str(&format_card(&panels.index_card));
            out.push_str(&format_card(&panels.waste_card));
            out.push_str("\nAnalyst Note:\n");
            for line in panels.note {
                out.push_str(&format!("  * {line}\n"));
            }

            for chart in [&panels.index_chart, &panels.waste_chart] {
                out.push('\n');
                out.push_str(&format_chart(chart, plot));
            }
        }
    }

    out
}

fn format_card(card: &MetricCard) -> String {
    format!("{:<24} {:>12} {:>9}\n", card.title, card.value, card.delta_text())
}

fn format_chart(chart: &Chart, plot: Option<(usize, usize)>) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {}: {} ---\n", chart.heading, chart.title));
    if let Some((width, height)) = plot {
        out.push_str(&render_ascii_chart(chart, width, height));
    } else if let (Some((first, last)), Some((min, max))) = (chart.date_range(), chart.value_range()) {
        out.push_str(&format!(
            "{} points, {first} .. {last}, {} range [{min:.2}, {max:.2}]\n",
            chart.points.len(),
            chart.y_label,
        ));
    }
    out.push_str(chart.caption);
    out.push('\n');
    out
}
