//! Summary metrics and text output.

pub mod format;

pub use format::*;

use crate::domain::TimePoint;

/// Percentage change from `previous` to `latest`.
///
/// `None` when `previous` is zero or either value is not finite.
pub fn pct_change(latest: f64, previous: f64) -> Option<f64> {
    if !(latest.is_finite() && previous.is_finite()) || previous == 0.0 {
        return None;
    }
    Some((latest - previous) / previous * 100.0)
}

/// Latest level and its change versus the previous period.
///
/// `None` for an empty series; the change is `None` with fewer than two points.
pub fn latest_with_change<T: TimePoint>(points: &[T]) -> Option<(f64, Option<f64>)> {
    let (latest, rest) = points.split_last()?;
    let change = rest
        .last()
        .and_then(|previous| pct_change(latest.level(), previous.level()));
    Some((latest.level(), change))
}

/// `10.00%`, `-5.00%`, or `n/a`.
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) => format!("{d:.2}%"),
        None => "n/a".to_string(),
    }
}

/// Round to a whole number and group thousands: `1234567.8` -> `1,234,568`.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        grouped.insert(0, '-');
    }
    grouped
}
