//! Table operations shared by both fetchers: ordering, cutoff filtering, and
//! monthly aggregation.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{IndexPoint, TimePoint, WasteMonthTotal};

/// Keep only points strictly after `cutoff`.
pub fn filter_after<T: TimePoint>(mut points: Vec<T>, cutoff: NaiveDate) -> Vec<T> {
    points.retain(|p| p.period() > cutoff);
    points
}

/// Sort ascending by date; for duplicate dates the later observation wins.
pub fn normalize_index(points: Vec<IndexPoint>) -> Vec<IndexPoint> {
    let by_date: BTreeMap<NaiveDate, f64> = points.into_iter().map(|p| (p.date, p.value)).collect();
    by_date
        .into_iter()
        .map(|(date, value)| IndexPoint { date, value })
        .collect()
}

/// Sum tonnage per calendar month. Output is ascending with one entry per month.
pub fn aggregate_monthly<I>(rows: I) -> Vec<WasteMonthTotal>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, tons) in rows {
        *totals.entry(month_start(date)).or_insert(0.0) += tons;
    }
    totals
        .into_iter()
        .map(|(month, total_tons)| WasteMonthTotal { month, total_tons })
        .collect()
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a month label into the first day of that month.
///
/// Accepted: `2023 / 04`, `2023/04`, `2023-04`, `2023-04-17`,
/// `2023-04-01T00:00:00` and `2023-04-01T00:00:00.000`.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(month_start(dt.date()));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(month_start(date));
    }

    // Year + month only: `YYYY / MM`, `YYYY/MM`, `YYYY-MM`.
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let (year, month) = compact.split_once(['/', '-'])?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn filter_is_strictly_after_cutoff() {
        let cutoff = ymd(2019, 1, 1);
        let points = vec![
            IndexPoint { date: ymd(2018, 12, 1), value: 1.0 },
            IndexPoint { date: ymd(2019, 1, 1), value: 2.0 },
            IndexPoint { date: ymd(2019, 2, 1), value: 3.0 },
        ];
        let kept = filter_after(points, cutoff);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, ymd(2019, 2, 1));
        assert!(kept.iter().all(|p| p.date > cutoff));
    }

    #[test]
    fn normalize_sorts_and_dedups() {
        let points = vec![
            IndexPoint { date: ymd(2020, 3, 1), value: 3.0 },
            IndexPoint { date: ymd(2020, 1, 1), value: 1.0 },
            IndexPoint { date: ymd(2020, 3, 1), value: 3.5 },
        ];
        let out = normalize_index(points);
        assert_eq!(
            out,
            vec![
                IndexPoint { date: ymd(2020, 1, 1), value: 1.0 },
                IndexPoint { date: ymd(2020, 3, 1), value: 3.5 },
            ]
        );
    }

    #[test]
    fn monthly_aggregation_sums_records_in_same_month() {
        // (refuse=10, paper=5) + (refuse=3, paper=2) in 2023-04.
        let rows = vec![
            (ymd(2023, 4, 1), 10.0 + 5.0),
            (ymd(2023, 3, 1), 1.0),
            (ymd(2023, 4, 1), 3.0 + 2.0),
        ];
        let out = aggregate_monthly(rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].month, ymd(2023, 3, 1));
        assert_eq!(out[1].month, ymd(2023, 4, 1));
        assert!((out[1].total_tons - 20.0).abs() < 1e-9);
    }

    #[test]
    fn aggregation_groups_by_calendar_month() {
        let out = aggregate_monthly(vec![(ymd(2023, 4, 1), 1.0), (ymd(2023, 4, 30), 2.0)]);
        assert_eq!(out.len(), 1);
        assert!((out[0].total_tons - 3.0).abs() < 1e-9);
    }

    #[test]
    fn parse_month_formats() {
        let april = Some(ymd(2023, 4, 1));
        assert_eq!(parse_month("2023 / 04"), april);
        assert_eq!(parse_month("2023/4"), april);
        assert_eq!(parse_month("2023-04"), april);
        assert_eq!(parse_month("2023-04-17"), april);
        assert_eq!(parse_month("2023-04-01T00:00:00.000"), april);
        assert_eq!(parse_month("2023-04-01T00:00:00"), april);
    }

    #[test]
    fn parse_month_rejects_garbage() {
        assert_eq!(parse_month(""), None);
        assert_eq!(parse_month("April"), None);
        assert_eq!(parse_month("2023 / 13"), None);
        assert_eq!(parse_month("23/04"), None);
    }
}
