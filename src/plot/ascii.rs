//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line charts: `*` at each observation, joined by `-`
//! - bar charts: one `#` column per month, rising from the bottom row

use crate::dashboard::{day_number, Chart, ChartKind};

/// Render a dashboard chart into a `width` x `height` character grid with a range header.
pub fn render_ascii_chart(chart: &Chart, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some((d_min, d_max)), Some((y_min, y_max))) = (chart.date_range(), chart.value_range()) else {
        return "Plot: (no data)\n".to_string();
    };
    let (y_min, y_max) = match chart.kind {
        // Bars keep their zero baseline on the bottom row.
        ChartKind::Bar => (y_min, y_max + pad(y_min, y_max, 0.05)),
        ChartKind::Line => {
            let p = pad(y_min, y_max, 0.05);
            (y_min - p, y_max + p)
        }
    };

    let x0 = day_number(d_min);
    let x1 = day_number(d_max);
    let mut grid = vec![vec![' '; width]; height];

    match chart.kind {
        ChartKind::Line => {
            let mut prev = None;
            for &(date, v) in &chart.points {
                let x = map_x(day_number(date), x0, x1, width);
                let y = map_y(v, y_min, y_max, height);
                if let Some((px, py)) = prev {
                    draw_line(&mut grid, px, py, x, y, '-');
                }
                prev = Some((x, y));
            }
            for &(date, v) in &chart.points {
                let x = map_x(day_number(date), x0, x1, width);
                let y = map_y(v, y_min, y_max, height);
                grid[y][x] = '*';
            }
        }
        ChartKind::Bar => {
            let base = map_y(0.0_f64.max(y_min), y_min, y_max, height);
            for &(date, v) in &chart.points {
                let x = map_x(day_number(date), x0, x1, width);
                let top = map_y(v, y_min, y_max, height);
                let (lo, hi) = if top <= base { (top, base) } else { (base, top) };
                for row in grid.iter_mut().take(hi + 1).skip(lo) {
                    row[x] = '#';
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: date=[{d_min}, {d_max}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

fn pad(min: f64, max: f64, frac: f64) -> f64 {
    ((max - min).abs() * frac).max(1e-12)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    if t_max <= t_min {
        return 0;
    }
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::dashboard::{INDUSTRY_RED, SERVICES_BLUE};

    fn chart(kind: ChartKind, points: Vec<(NaiveDate, f64)>) -> Chart {
        Chart {
            heading: "h",
            title: "t",
            caption: "c",
            y_label: "y",
            kind,
            color: if kind == ChartKind::Line { INDUSTRY_RED } else { SERVICES_BLUE },
            points,
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn line_golden_snapshot_small() {
        let c = chart(ChartKind::Line, vec![(d(1), 100.0), (d(10), 110.0)]);
        let txt = render_ascii_chart(&c, 10, 5);
        let expected = concat!(
            "Plot: date=[2024-01-01, 2024-01-10] | y=[99.50, 110.50]\n",
            "        -*\n",
            "      --\n",
            "    --\n",
            "  --\n",
            "*-\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn bars_rise_from_bottom_row() {
        let c = chart(ChartKind::Bar, vec![(d(1), 10.0), (d(10), 20.0)]);
        let txt = render_ascii_chart(&c, 10, 5);
        let expected = concat!(
            "Plot: date=[2024-01-01, 2024-01-10] | y=[0.00, 21.00]\n",
            "         #\n",
            "         #\n",
            "#        #\n",
            "#        #\n",
            "#        #\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_chart_has_placeholder() {
        let c = chart(ChartKind::Line, Vec::new());
        assert_eq!(render_ascii_chart(&c, 10, 5), "Plot: (no data)\n");
    }
}
