//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted curve: `-` line
//! - optional highlights: `^` (furthest above the fit), `v` (furthest below)

use std::collections::HashSet;

use crate::domain::{Dataset, FitResult, Point};
use crate::io::result::ResultFile;
use crate::models::predict;
use crate::report::Rankings;

/// x-range used when the data cannot provide one.
const DEFAULT_X_RANGE: (f64, f64) = (0.0, 6.0);

/// Render observed points and the fitted curve.
pub fn render_ascii_plot(
    data: &Dataset,
    fit: &FitResult,
    width: usize,
    height: usize,
    rankings: Option<&Rankings>,
) -> String {
    let (x_min, x_max) = x_range(data.points()).unwrap_or(DEFAULT_X_RANGE);
    let curve = sample_curve(fit, x_min, x_max, width.max(2));
    render_plot(data.points(), &curve, x_min, x_max, width, height, rankings)
}

/// Render a saved fit result; points are overlaid when the file carries them.
pub fn render_ascii_plot_from_result(file: &ResultFile, width: usize, height: usize) -> String {
    let points = file.data.as_ref().map(|d| d.points()).unwrap_or(&[]);
    let (x_min, x_max) = x_range(points).unwrap_or(DEFAULT_X_RANGE);
    let curve = sample_curve(&file.fit, x_min, x_max, width.max(2));
    render_plot(points, &curve, x_min, x_max, width, height, None)
}

fn render_plot(
    points: &[Point],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    width: usize,
    height: usize,
    rankings: Option<&Rankings>,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(points, curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so points overlay it.
    draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);

    let key = |p: &Point| (p.x.to_bits(), p.y.to_bits());
    let (above, below): (HashSet<_>, HashSet<_>) = rankings
        .map(|r| {
            (
                r.above.iter().map(|x| key(&x.point)).collect(),
                r.below.iter().map(|x| key(&x.point)).collect(),
            )
        })
        .unwrap_or_default();

    for p in points {
        let x = map_x(p.x, x_min, x_max, width);
        let y = map_y(p.y, y_min, y_max, height);

        let ch = if above.contains(&key(p)) {
            '^'
        } else if below.contains(&key(p)) {
            'v'
        } else {
            'o'
        };

        grid[y][x] = ch;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n",
        curve_label(curve)
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn curve_label(curve: &[(f64, f64)]) -> &'static str {
    if curve.len() >= 2 { "curve" } else { "no curve" }
}

fn x_range(points: &[Point]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

/// Evenly sampled curve; non-finite predictions are dropped.
fn sample_curve(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, predict(fit.model, &fit.params, x))
        })
        .filter(|(_, y)| y.is_finite())
        .collect()
}

fn y_range(points: &[Point], curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for y in points.iter().map(|p| p.y).chain(curve.iter().map(|&(_, y)| y)) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && min_y == max_y {
        Some((min_y - 1.0, max_y + 1.0))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y_max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
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
