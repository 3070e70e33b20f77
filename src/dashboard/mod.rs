//! Dashboard view model.
//!
//! [`Dashboard::build`] turns one render pass into everything a front-end
//! draws: title, error banners, and either the full body (three cards + two
//! charts) or the single warning that replaces it. The report, HTML, and TUI
//! front-ends render this model and hold no logic of their own.

use chrono::{Datelike, NaiveDate};

use crate::app::pipeline::LoadOutput;
use crate::domain::TimePoint;
use crate::report::{format_delta, format_thousands, latest_with_change};

pub mod html;

pub const TITLE: &str = "The Trash Index: Alternative Economic Data";
pub const SUBTITLE: &str = "Tracking 'Real' Economic Activity via Waste & Packaging Volume";
pub const WARNING: &str =
    "Data is loading... If this takes too long, please check your API key configuration.";

pub const ANALYST_NOTE: [&str; 3] = [
    "Cardboard (Manufacturing): Measures industrial output & shipping demand.",
    "Waste (Consumption): Measures consumer spending behavior.",
    "Divergence: If Cardboard drops while Waste stays high, expect a supply chain lag.",
];

/// RGB triple used by every renderer.
pub type Rgb = (u8, u8, u8);

pub const INDUSTRY_RED: Rgb = (0xFF, 0x4B, 0x4B);
pub const SERVICES_BLUE: Rgb = (0x00, 0x68, 0xC9);

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub delta: Option<f64>,
}

impl MetricCard {
    pub fn delta_text(&self) -> String {
        format_delta(self.delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// A captioned time-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub heading: &'static str,
    pub title: &'static str,
    pub caption: &'static str,
    pub y_label: &'static str,
    pub kind: ChartKind,
    pub color: Rgb,
    pub points: Vec<(NaiveDate, f64)>,
}

impl Chart {
    fn from_series<T: TimePoint>(
        heading: &'static str,
        title: &'static str,
        caption: &'static str,
        y_label: &'static str,
        kind: ChartKind,
        color: Rgb,
        series: &[T],
    ) -> Self {
        Self {
            heading,
            title,
            caption,
            y_label,
            kind,
            color,
            points: series.iter().map(|p| (p.period(), p.level())).collect(),
        }
    }

    /// Inclusive date range covered by the points.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Min/max of the values; bar charts always include zero.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &(_, v) in &self.points {
            min = min.min(v);
            max = max.max(v);
        }
        if self.kind == ChartKind::Bar {
            min = min.min(0.0);
        }
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }

    /// Padded plot area as `((x0, x1), (y0, y1))`, x in days since the CE epoch.
    ///
    /// Half a month on each side of x so edge bars are not clipped; 5% on y,
    /// except that bars keep their zero baseline.
    pub fn plot_bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let (d0, d1) = self.date_range()?;
        let (v0, v1) = self.value_range()?;

        let pad = ((v1 - v0).abs() * 0.05).max(1e-9);
        let y0 = if self.kind == ChartKind::Bar { v0 } else { v0 - pad };
        Some(((day_number(d0) - 16.0, day_number(d1) + 16.0), (y0, v1 + pad)))
    }
}

/// Day number used as the numeric x coordinate of a date.
pub fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// `YYYY-MM` label for an x coordinate produced by [`day_number`].
pub fn fmt_month(day: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(day.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Cards and charts, present only when both series have data.
#[derive(Debug, Clone, PartialEq)]
pub struct Panels {
    pub index_card: MetricCard,
    pub waste_card: MetricCard,
    pub note: [&'static str; 3],
    pub index_chart: Chart,
    pub waste_chart: Chart,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Ready(Box<Panels>),
    /// Either series is empty: show this text and draw nothing else.
    Warning(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// One entry per failed fetch.
    pub banners: Vec<String>,
    pub body: Body,
}

impl Dashboard {
    pub fn build(output: &LoadOutput) -> Self {
        let banners = [&output.index.diagnostic, &output.waste.diagnostic]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        let body = match (
            latest_with_change(&output.index.items),
            latest_with_change(&output.waste.items),
        ) {
            (Some((index_latest, index_delta)), Some((waste_latest, waste_delta))) => {
                Body::Ready(Box::new(Panels {
                    index_card: MetricCard {
                        title: "Cardboard Demand (PPI)",
                        value: format!("{index_latest:.1}"),
                        delta: index_delta,
                    },
                    waste_card: MetricCard {
                        title: "NYC Waste (Tons)",
                        value: format_thousands(waste_latest),
                        delta: waste_delta,
                    },
                    note: ANALYST_NOTE,
                    index_chart: Chart::from_series(
                        "Manufacturing Signal",
                        "Cardboard Box Producer Price Index (PPI)",
                        "Source: Federal Reserve Economic Data (FRED)",
                        "Index Value",
                        ChartKind::Line,
                        INDUSTRY_RED,
                        &output.index.items,
                    ),
                    waste_chart: Chart::from_series(
                        "Consumer Signal",
                        "NYC Monthly Waste Tonnage",
                        "Source: NYC Open Data Portal",
                        "Total Waste (tons)",
                        ChartKind::Bar,
                        SERVICES_BLUE,
                        &output.waste.items,
                    ),
                }))
            }
            _ => Body::Warning(WARNING),
        };

        Self {
            title: TITLE,
            subtitle: SUBTITLE,
            banners,
            body,
        }
    }

    pub fn charts(&self) -> Vec<&Chart> {
        match &self.body {
            Body::Ready(panels) => vec![&panels.index_chart, &panels.waste_chart],
            Body::Warning(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;

    use crate::app::pipeline::Loaded;
    use crate::domain::{IndexPoint, WasteMonthTotal};

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    pub(crate) fn sample_output() -> LoadOutput {
        LoadOutput {
            index: Loaded::ok(
                vec![
                    IndexPoint { date: ymd(2024, 1), value: 100.0 },
                    IndexPoint { date: ymd(2024, 2), value: 110.0 },
                ],
                Utc::now(),
            ),
            waste: Loaded::ok(
                vec![
                    WasteMonthTotal { month: ymd(2024, 1), total_tons: 200_000.0 },
                    WasteMonthTotal { month: ymd(2024, 2), total_tons: 190_000.0 },
                ],
                Utc::now(),
            ),
        }
    }

    #[test]
    fn ready_dashboard_has_cards_and_two_charts() {
        let dash = Dashboard::build(&sample_output());
        assert!(dash.banners.is_empty());
        let Body::Ready(panels) = &dash.body else {
            panic!("expected ready body");
        };
        assert_eq!(panels.index_card.value, "110.0");
        assert_eq!(panels.index_card.delta_text(), "10.00%");
        assert_eq!(panels.waste_card.value, "190,000");
        assert_eq!(panels.waste_card.delta_text(), "-5.00%");
        assert_eq!(dash.charts().len(), 2);
        assert_eq!(panels.index_chart.kind, ChartKind::Line);
        assert_eq!(panels.waste_chart.kind, ChartKind::Bar);
    }

    #[test]
    fn empty_series_gates_to_warning_with_zero_charts() {
        let mut output = sample_output();
        output.waste = Loaded::failed("Error fetching waste tonnage data: boom");
        let dash = Dashboard::build(&output);
        assert_eq!(dash.body, Body::Warning(WARNING));
        assert!(dash.charts().is_empty());
        assert_eq!(dash.banners, vec!["Error fetching waste tonnage data: boom".to_string()]);
    }

    #[test]
    fn empty_without_error_still_warns() {
        let mut output = sample_output();
        output.index.items.clear();
        let dash = Dashboard::build(&output);
        assert!(dash.banners.is_empty());
        assert!(dash.charts().is_empty());
    }

    #[test]
    fn single_point_series_renders_without_delta() {
        let mut output = sample_output();
        output.index.items.truncate(1);
        let dash = Dashboard::build(&output);
        let Body::Ready(panels) = &dash.body else {
            panic!("expected ready body");
        };
        assert_eq!(panels.index_card.delta_text(), "n/a");
    }

    #[test]
    fn bar_range_includes_zero() {
        let dash = Dashboard::build(&sample_output());
        let charts = dash.charts();
        assert_eq!(charts[1].value_range(), Some((0.0, 200_000.0)));
        assert_eq!(charts[0].value_range(), Some((100.0, 110.0)));
        assert_eq!(charts[0].date_range(), Some((ymd(2024, 1), ymd(2024, 2))));
    }

    #[test]
    fn plot_bounds_pad_dates_and_values() {
        let dash = Dashboard::build(&sample_output());
        let charts = dash.charts();

        let ((x0, x1), (y0, y1)) = charts[0].plot_bounds().unwrap();
        assert_eq!(x0, day_number(ymd(2024, 1)) - 16.0);
        assert_eq!(x1, day_number(ymd(2024, 2)) + 16.0);
        assert!((y0 - 99.5).abs() < 1e-9);
        assert!((y1 - 110.5).abs() < 1e-9);

        let (_, (bar_y0, bar_y1)) = charts[1].plot_bounds().unwrap();
        assert_eq!(bar_y0, 0.0);
        assert!((bar_y1 - 210_000.0).abs() < 1e-6);
    }

    #[test]
    fn month_labels_round_trip_day_numbers() {
        let day = day_number(NaiveDate::from_ymd_opt(2023, 4, 15).unwrap());
        assert_eq!(fmt_month(day), "2023-04");
    }
}
