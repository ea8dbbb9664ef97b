//! Polynomial degree scan using BIC with a simplicity guardrail.
//!
//! For each degree `d` in `0..=max_degree` we fit a squared-loss polynomial and
//! compute:
//! - SSE / RMSE
//! - BIC = n * ln(SSE/n) + k * ln(n), with `k = d + 1`
//!
//! Selection rules:
//! 1. Skip underdetermined degrees (`n < k`)
//! 2. Choose the degree with minimum BIC
//! 3. If a lower degree is within ΔBIC < 2 of the best, prefer the lower degree

use log::info;

use crate::domain::{Dataset, FitOptions, FitResult, LossKind, ModelFamily};
use crate::error::FitError;
use crate::fit::fitter::fit;

/// BIC margin under which the simpler model wins.
const BIC_TIE_MARGIN: f64 = 2.0;

/// SSE floor so that exact fits don't produce `ln(0)`.
const SSE_FLOOR: f64 = 1e-300;

/// Diagnostics for a single degree.
#[derive(Debug, Clone)]
pub struct DegreeFit {
    pub degree: usize,
    pub fit: FitResult,
    pub sse: f64,
    pub rmse: f64,
    pub bic: f64,
}

/// Output of the degree scan.
#[derive(Debug, Clone)]
pub struct DegreeScan {
    pub fits: Vec<DegreeFit>,
    /// Degrees that were not attempted and why.
    pub skipped: Vec<(usize, String)>,
    /// Index into `fits` of the selected degree.
    pub best: usize,
}

impl DegreeScan {
    pub fn best_fit(&self) -> &DegreeFit {
        &self.fits[self.best]
    }
}

/// Fit squared-loss polynomials of degree `0..=max_degree` and pick one by BIC.
pub fn scan_degrees(data: &Dataset, max_degree: usize, opts: &FitOptions) -> Result<DegreeScan, FitError> {
    if data.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    let n = data.len();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for degree in 0..=max_degree {
        let k = degree + 1;
        if n < k {
            // Every higher degree is underdetermined too.
            skipped.push((degree, format!("Underdetermined: n={n} < k={k} (degrees {degree}..={max_degree})")));
            break;
        }

        let model = ModelFamily::Polynomial { degree };
        let result = fit(data, model, &LossKind::Squared, &vec![0.0; k], opts)?;
        let sse = result.loss_value.max(0.0);
        let rmse = (sse / n as f64).sqrt();
        let bic = n as f64 * (sse.max(SSE_FLOOR) / n as f64).ln() + k as f64 * (n as f64).ln();
        fits.push(DegreeFit {
            degree,
            fit: result,
            sse,
            rmse,
            bic,
        });
    }

    let best = select_by_bic(&fits).ok_or(FitError::EmptyDataset)?;
    info!(
        "degree scan: selected d={} (BIC={:.3}) from {} candidates",
        fits[best].degree,
        fits[best].bic,
        fits.len()
    );

    Ok(DegreeScan { fits, skipped, best })
}

/// Minimum BIC, then walk down to the lowest degree within the tie margin.
fn select_by_bic(fits: &[DegreeFit]) -> Option<usize> {
    if fits.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, f) in fits.iter().enumerate().skip(1) {
        if f.bic < fits[best].bic {
            best = i;
        }
    }

    // `fits` is ordered by increasing degree.
    (0..best)
        .find(|&i| fits[i].bic - fits[best].bic < BIC_TIE_MARGIN)
        .or(Some(best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitStatus;

    fn fake(degree: usize, bic: f64) -> DegreeFit {
        DegreeFit {
            degree,
            fit: FitResult {
                model: ModelFamily::Polynomial { degree },
                loss: "squared".to_string(),
                params: vec![0.0; degree + 1],
                loss_value: 0.0,
                status: FitStatus::Converged,
                iterations: 0,
                cost_evals: 0,
            },
            sse: 0.0,
            rmse: 0.0,
            bic,
        }
    }

    #[test]
    fn bic_prefers_simpler_within_margin() {
        let fits = vec![fake(0, 50.0), fake(1, 10.0), fake(2, 9.0), fake(3, 12.0)];
        assert_eq!(select_by_bic(&fits), Some(1));

        let fits = vec![fake(0, 50.0), fake(1, 10.0), fake(2, 5.0)];
        assert_eq!(select_by_bic(&fits), Some(2));
        assert_eq!(select_by_bic(&[]), None);
    }

    #[test]
    fn scan_picks_quadratic_for_quadratic_data() {
        // Deterministic wiggle so the true model does not fit exactly.
        let pairs: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let x = -2.0 + i as f64 * 0.2;
                let wiggle = if i % 2 == 0 { 0.05 } else { -0.05 };
                (x, 1.0 + 0.5 * x - 2.0 * x * x + wiggle)
            })
            .collect();
        let data = Dataset::from_pairs(&pairs).unwrap();
        let scan = scan_degrees(&data, 4, &FitOptions::default()).unwrap();
        assert_eq!(scan.fits.len(), 5);
        assert!(scan.skipped.is_empty());
        assert_eq!(scan.best_fit().degree, 2);
    }

    #[test]
    fn underdetermined_degrees_are_skipped() {
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 2.0)]).unwrap();
        let scan = scan_degrees(&data, 3, &FitOptions::default()).unwrap();
        assert_eq!(scan.fits.len(), 2);
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].0, 2);
        assert!(scan.skipped[0].1.contains("degrees 2..=3"));

        let scan = scan_degrees(&data, usize::MAX, &FitOptions::default()).unwrap();
        assert_eq!(scan.fits.len(), 2);
    }
}
