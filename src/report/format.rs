//! Formatted terminal output.
//!
//! Formatting lives here so the fitting code stays free of presentation and
//! output changes are localized.

use crate::domain::{Dataset, FitConfig, FitResult, FitStatus, PointResidual};
use crate::fit::{DegreeScan, LossComparison, LossSurface};
use crate::report::Rankings;

/// Dataset stats + fit diagnostics for one run.
pub fn format_run_summary(data: &Dataset, fit: &FitResult, config: &FitConfig) -> String {
    let mut out = String::new();

    out.push_str("=== lsq - curve fitting by loss minimization ===\n");
    match &config.csv_path {
        Some(path) => out.push_str(&format!("Data: {}\n", path.display())),
        None => out.push_str("Data: built-in y = 5x + 3, x = 0..6 step 0.5\n"),
    }
    if config.noise_sigma > 0.0 {
        out.push_str(&format!("Noise: sigma={} seed={}\n", config.noise_sigma, config.seed));
    }
    if let Some((x_min, x_max, y_min, y_max)) = data.bounds() {
        out.push_str(&format!(
            "Points: n={} | x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n",
            data.len()
        ));
    }

    out.push_str("\nFit:\n");
    out.push_str(&format!("- model : {}\n", fit.model.display_name()));
    out.push_str(&format!("- loss  : {}\n", fit.loss));
    out.push_str(&format!("- params: {}\n", fmt_params(fit)));
    out.push_str(&format!("- value : {:.6e}\n", fit.loss_value));
    out.push_str(&format!(
        "- status: {} ({} iterations, {} loss evaluations)\n",
        fmt_status(fit.status),
        fit.iterations,
        fit.cost_evals
    ));
    out.push('\n');

    out
}

/// Compact single-line fit description (used by the explore prompt).
pub fn format_fit_line(fit: &FitResult, config: &FitConfig) -> String {
    format!(
        "{} | {} loss={:.6e} | {} | noise={} seed={} | {}",
        fit.model.display_name(),
        fit.loss,
        fit.loss_value,
        fmt_params(fit),
        config.noise_sigma,
        config.seed,
        fmt_status(fit.status)
    )
}

/// Format the above/below residual tables.
pub fn format_rankings(rankings: &Rankings) -> String {
    let mut out = String::new();

    out.push_str("Largest residuals above the fit:\n");
    out.push_str(&format_residual_table(&rankings.above));
    out.push('\n');

    out.push_str("Largest residuals below the fit:\n");
    out.push_str(&format_residual_table(&rankings.below));

    out
}

/// `x, y, y_fit, residual` table.
pub fn format_residual_table(rows: &[PointResidual]) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:>12} {:>12} {:>12} {:>12}", "x", "y", "y_fit", "residual"));
    push_line(&mut out, format!("{:-<12} {:-<12} {:-<12} {:-<12}", "", "", "", ""));

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                r.point.x, r.point.y, r.y_fit, r.residual
            ),
        );
    }

    out
}

/// One row per loss, followed by the closed-form squared-loss solution.
pub fn format_comparison(cmp: &LossComparison) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loss comparison ({}):\n", cmp.model.display_name()));
    push_line(
        &mut out,
        format!("{:<10} {:<16} {:>14}  {}", "loss", "status", "value", "params"),
    );
    push_line(&mut out, format!("{:-<10} {:-<16} {:-<14}  {:-<6}", "", "", "", ""));

    for row in &cmp.rows {
        let line = match &row.outcome {
            Ok(fit) => format!(
                "{:<10} {:<16} {:>14.6e}  {}",
                row.loss.display_name(),
                fmt_status(fit.status),
                fit.loss_value,
                fmt_vec(&fit.params)
            ),
            Err(e) => format!("{:<10} {:<16} {:>14}  {e}", row.loss.display_name(), "diverged", "-"),
        };
        push_line(&mut out, line);
    }

    out.push('\n');
    match &cmp.closed_form {
        Ok(params) => out.push_str(&format!("Closed-form squared-loss solution: {}\n", fmt_vec(params))),
        Err(e) => out.push_str(&format!("Closed-form squared-loss solution unavailable: {e}\n")),
    }

    out
}

/// Degree scan diagnostics with the selected degree marked.
pub fn format_degree_scan(scan: &DegreeScan) -> String {
    let mut out = String::new();
    out.push_str("Degree diagnostics (squared loss):\n");
    for (i, f) in scan.fits.iter().enumerate() {
        let chosen = if i == scan.best { "*" } else { " " };
        let note = if f.fit.status.is_converged() { "" } else { " (iteration cap)" };
        push_line(
            &mut out,
            format!(
                "{chosen} d={:<3} SSE={:.6e} RMSE={:.6} BIC={:.3}{note}",
                f.degree, f.sse, f.rmse, f.bic
            ),
        );
    }
    for (degree, reason) in &scan.skipped {
        out.push_str(&format!("  (skipped d={degree}) {reason}\n"));
    }

    let best = scan.best_fit();
    out.push_str(&format!("\nChosen degree: {}\n", best.degree));
    out.push_str(&format!("- params: {}\n", fmt_params(&best.fit)));

    out
}

/// Grid shape and extreme cells of a loss surface.
pub fn format_surface_summary(surface: &LossSurface) -> String {
    let min = surface.min_cell();
    let max = surface.max_cell();
    let (m0, m1) = axis_bounds(&surface.slopes);
    let (b0, b1) = axis_bounds(&surface.intercepts);

    let mut out = String::new();
    out.push_str(&format!("Loss surface ({} loss, affine model):\n", surface.loss));
    out.push_str(&format!(
        "Grid: {} x {} | m=[{m0:.3}, {m1:.3}] | b=[{b0:.3}, {b1:.3}]\n",
        surface.slopes.len(),
        surface.intercepts.len()
    ));
    out.push_str(&format!(
        "Min: loss={:.6e} at m={:.4}, b={:.4}\n",
        min.loss, min.slope, min.intercept
    ));
    out.push_str(&format!(
        "Max: loss={:.6e} at m={:.4}, b={:.4}\n",
        max.loss, max.slope, max.intercept
    ));
    out
}

/// `name=value` pairs in parameter order.
pub fn fmt_params(fit: &FitResult) -> String {
    let parts: Vec<String> = fit
        .model
        .param_names()
        .iter()
        .zip(&fit.params)
        .map(|(name, v)| format!("{name}={v:.6}"))
        .collect();
    parts.join(", ")
}

pub fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_status(status: FitStatus) -> &'static str {
    match status {
        FitStatus::Converged => "converged",
        FitStatus::MaxIterations => "max-iterations",
    }
}

fn axis_bounds(axis: &[f64]) -> (f64, f64) {
    (
        axis.first().copied().unwrap_or(f64::NAN),
        axis.last().copied().unwrap_or(f64::NAN),
    )
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitOptions, LossKind, ModelFamily, Point};
    use crate::error::FitError;
    use crate::fit::LossRow;

    fn fit(params: Vec<f64>, status: FitStatus) -> FitResult {
        FitResult {
            model: ModelFamily::Affine,
            loss: "squared".to_string(),
            params,
            loss_value: 0.0,
            status,
            iterations: 12,
            cost_evals: 30,
        }
    }

    #[test]
    fn residual_table_layout() {
        let rows = vec![PointResidual {
            point: Point { x: 1.0, y: 8.5 },
            y_fit: 8.0,
            residual: 0.5,
        }];
        let txt = format_residual_table(&rows);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "           x            y        y_fit     residual");
        assert_eq!(lines[2], "      1.0000       8.5000       8.0000       0.5000");
    }

    #[test]
    fn summary_names_parameters() {
        let data = Dataset::from_pairs(&[(0.0, 3.0), (1.0, 8.0)]).unwrap();
        let txt = format_run_summary(&data, &fit(vec![5.0, 3.0], FitStatus::Converged), &FitConfig::default());
        assert!(txt.contains("built-in y = 5x + 3"));
        assert!(txt.contains("- params: m=5.000000, b=3.000000"));
        assert!(txt.contains("converged (12 iterations, 30 loss evaluations)"));
        assert!(!txt.contains("Noise:"));
    }

    #[test]
    fn comparison_reports_failed_rows() {
        let cmp = LossComparison {
            model: ModelFamily::Affine,
            rows: vec![
                LossRow {
                    loss: LossKind::Sum,
                    outcome: Err(FitError::NonFiniteLoss {
                        value: f64::NEG_INFINITY,
                        params: vec![1e308, 1e308],
                    }),
                },
                LossRow {
                    loss: LossKind::Squared,
                    outcome: Ok(fit(vec![5.0, 3.0], FitStatus::Converged)),
                },
            ],
            closed_form: Ok(vec![5.0, 3.0]),
        };
        let txt = format_comparison(&cmp);
        let sum_line = txt.lines().find(|l| l.starts_with("sum")).unwrap();
        assert!(sum_line.contains("diverged"));
        let sq_line = txt.lines().find(|l| l.starts_with("squared")).unwrap();
        assert!(sq_line.contains("converged"));
        assert!(sq_line.ends_with("[5.000000, 3.000000]"));
        assert!(txt.contains("Closed-form squared-loss solution: [5.000000, 3.000000]"));
    }

    #[test]
    fn degree_scan_marks_choice() {
        let pairs: Vec<(f64, f64)> = (0..10)
            .map(|i| {
                let wiggle = if i % 2 == 0 { 0.3 } else { -0.3 };
                (i as f64, 2.0 * i as f64 + 1.0 + wiggle)
            })
            .collect();
        let data = Dataset::from_pairs(&pairs).unwrap();
        let scan = crate::fit::scan_degrees(&data, 2, &FitOptions::default()).unwrap();
        let txt = format_degree_scan(&scan);
        assert!(txt.contains("* d=1"));
        assert!(txt.contains("Chosen degree: 1"));
        assert!(txt.lines().all(|l| l == l.trim_end()));
    }

    #[test]
    fn fit_line_mentions_settings() {
        let line = format_fit_line(&fit(vec![5.0, 3.0], FitStatus::MaxIterations), &FitConfig::default());
        assert_eq!(
            line,
            "affine | squared loss=0.000000e0 | m=5.000000, b=3.000000 | noise=0 seed=42 | max-iterations"
        );
    }

    #[test]
    fn fmt_vec_basic() {
        assert_eq!(fmt_vec(&[]), "[]");
        assert_eq!(fmt_vec(&[1.0, -0.5]), "[1.000000, -0.500000]");
    }
}
