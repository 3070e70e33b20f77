//! Single-page HTML rendering with inline SVG charts.
//!
//! Charts go through Plotters' SVG backend so the page and the TUI share the
//! same drawing code path (`ChartBuilder` + mesh + series).

use std::fmt::Write as _;
use std::path::Path;

use plotters::prelude::*;

use crate::dashboard::{day_number, fmt_month, Body, Chart, ChartKind, Dashboard, MetricCard};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (640, 350);

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; color: #262730; }
.cards { display: flex; gap: 1rem; }
.metric-card { flex: 1; background-color: #f0f2f6; border-radius: 10px; padding: 20px; text-align: center; }
.metric-card .value { font-size: 2rem; }
.delta-up { color: #09ab3b; }
.delta-down { color: #ff2b2b; }
.note { flex: 1; background-color: #e8f0fe; border-radius: 10px; padding: 20px; }
.charts { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.caption { color: #808495; font-size: 0.8rem; }
.error { background-color: #ffe2e2; border-radius: 6px; padding: 10px; margin: 0.5rem 0; }
.warning { background-color: #fff8d6; border-radius: 6px; padding: 10px; }
"#;

/// Render the dashboard as a standalone HTML document.
pub fn render_html(dash: &Dashboard) -> Result<String, AppError> {
    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>\n<html lang=\"en\">\n<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape(dash.title));
    let _ = writeln!(out, "<style>{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>{}</h1>", escape(dash.title));
    let _ = writeln!(out, "<h3>{}</h3>\n<hr>", escape(dash.subtitle));

    for banner in &dash.banners {
        let _ = writeln!(out, "<div class=\"error\">{}</div>", escape(banner));
    }

    match &dash.body {
        Body::Warning(text) => {
            let _ = writeln!(out, "<div class=\"warning\">{}</div>", escape(text));
        }
        Body::Ready(panels) => {
            out.push_str("<div class=\"cards\">\n");
            out.push_str(&card_html(&panels.index_card));
            out.push_str(&card_html(&panels.waste_card));
            out.push_str("<div class=\"note\"><strong>Analyst Note:</strong><ul>\n");
            for line in panels.note {
                let _ = writeln!(out, "<li>{}</li>", escape(line));
            }
            out.push_str("</ul></div>\n</div>\n<hr>\n<div class=\"charts\">\n");

            for chart in [&panels.index_chart, &panels.waste_chart] {
                let svg = render_svg(chart, CHART_SIZE)?;
                let _ = writeln!(
                    out,
                    "<section><h3>{}</h3>\n{svg}\n<p class=\"caption\">{}</p></section>",
                    escape(chart.heading),
                    escape(chart.caption),
                );
            }
            out.push_str("</div>\n");
        }
    }

    out.push_str("</body>\n</html>\n");
    Ok(out)
}

/// Render and write the page to `path`.
pub fn write_html(path: &Path, dash: &Dashboard) -> Result<(), AppError> {
    let html = render_html(dash)?;
    std::fs::write(path, html)
        .map_err(|e| AppError::new(2, format!("Failed to write HTML '{}': {e}", path.display())))
}

fn card_html(card: &MetricCard) -> String {
    let class = match card.delta {
        Some(d) if d < 0.0 => "delta-down",
        Some(_) => "delta-up",
        None => "",
    };
    format!(
        "<div class=\"metric-card\"><div>{}</div><div class=\"value\">{}</div><div class=\"{class}\">{}</div></div>\n",
        escape(card.title),
        escape(&card.value),
        escape(&card.delta_text()),
    )
}

/// Draw one chart into an SVG string.
pub fn render_svg(chart: &Chart, size: (u32, u32)) -> Result<String, AppError> {
    let Some(((x0, x1), (y0, y1))) = chart.plot_bounds() else {
        return Err(AppError::new(4, format!("Chart '{}' has no data.", chart.title)));
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut cc = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 18))
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 30)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_err)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&|v| fmt_month(*v))
            .y_desc(chart.y_label)
            .draw()
            .map_err(plot_err)?;

        let (r, g, b) = chart.color;
        let color = RGBColor(r, g, b);
        match chart.kind {
            ChartKind::Line => {
                cc.draw_series(LineSeries::new(
                    chart.points.iter().map(|&(d, v)| (day_number(d), v)),
                    color.stroke_width(2),
                ))
                .map_err(plot_err)?;
            }
            ChartKind::Bar => {
                cc.draw_series(chart.points.iter().map(|&(d, v)| {
                    let x = day_number(d);
                    Rectangle::new([(x - 12.0, 0.0), (x + 12.0, v)], color.filled())
                }))
                .map_err(plot_err)?;
            }
        }

        root.present().map_err(plot_err)?;
    }
    Ok(svg)
}

fn plot_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::new(4, format!("Failed to render chart: {e}"))
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::Loaded;
    use crate::dashboard::tests::sample_output;
    use crate::dashboard::WARNING;

    #[test]
    fn ready_page_embeds_two_svgs() {
        let html = render_html(&Dashboard::build(&sample_output())).unwrap();
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("Cardboard Demand (PPI)"));
        assert!(html.contains("class=\"delta-down\">-5.00%"));
        assert!(html.contains("Source: NYC Open Data Portal"));
    }

    #[test]
    fn warning_page_draws_no_charts() {
        let mut output = sample_output();
        output.waste = Loaded::failed("Error fetching waste tonnage data: <timeout>");
        let html = render_html(&Dashboard::build(&output)).unwrap();
        assert_eq!(html.matches("<svg").count(), 0);
        assert!(html.contains(&escape(WARNING)));
        assert!(html.contains("Error fetching waste tonnage data: &lt;timeout&gt;"));
    }

    #[test]
    fn write_html_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.html");
        write_html(&path, &Dashboard::build(&sample_output())).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("a<b & 'c'"), "a&lt;b &amp; &#39;c&#39;");
    }
}
