//! Reporting utilities: residuals, rankings, and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, FitResult, PointResidual};
use crate::error::FitError;
use crate::loss::point_residuals;

/// Points furthest from the fitted curve on each side (top-N each side).
#[derive(Debug, Clone)]
pub struct Rankings {
    /// Largest positive residuals (observation above the curve).
    pub above: Vec<PointResidual>,
    /// Most negative residuals (observation below the curve).
    pub below: Vec<PointResidual>,
}

/// Compute fitted values and residuals for each observation.
pub fn compute_residuals(data: &Dataset, fit: &FitResult) -> Result<Vec<PointResidual>, FitError> {
    let out = point_residuals(fit.model, &fit.params, data);
    if let Some(bad) = out.iter().find(|r| !r.y_fit.is_finite()) {
        return Err(FitError::NonFiniteLoss {
            value: bad.y_fit,
            params: fit.params.clone(),
        });
    }
    Ok(out)
}

/// Rank the points the fit misses most, above and below the curve.
///
/// Zero residuals are ranked on neither side.
pub fn rank_residuals(residuals: &[PointResidual], top_n: usize) -> Rankings {
    let mut above: Vec<PointResidual> = residuals.iter().copied().filter(|r| r.residual > 0.0).collect();
    above.sort_by(|a, b| b.residual.total_cmp(&a.residual));
    above.truncate(top_n);

    let mut below: Vec<PointResidual> = residuals.iter().copied().filter(|r| r.residual < 0.0).collect();
    below.sort_by(|a, b| a.residual.total_cmp(&b.residual));
    below.truncate(top_n);

    Rankings { above, below }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStatus, ModelFamily};

    fn fit_line(m: f64, b: f64) -> FitResult {
        FitResult {
            model: ModelFamily::Affine,
            loss: "squared".to_string(),
            params: vec![m, b],
            loss_value: 0.0,
            status: FitStatus::Converged,
            iterations: 0,
            cost_evals: 0,
        }
    }

    #[test]
    fn compute_residuals_basic() {
        let data = Dataset::from_pairs(&[(1.0, 100.0), (2.0, 101.0)]).unwrap();
        let residuals = compute_residuals(&data, &fit_line(0.0, 100.0)).unwrap();
        assert_eq!(residuals.len(), 2);
        assert!(residuals[0].residual.abs() < 1e-12);
        assert!((residuals[1].residual - 1.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_prediction_is_an_error() {
        let data = Dataset::from_pairs(&[(1e300, 0.0)]).unwrap();
        assert!(compute_residuals(&data, &fit_line(1e300, 0.0)).is_err());
    }

    #[test]
    fn rank_residuals_basic() {
        let data = Dataset::from_pairs(&[(1.0, 100.0), (2.0, 105.0), (3.0, 95.0), (4.0, 102.0)]).unwrap();
        let residuals = compute_residuals(&data, &fit_line(0.0, 100.0)).unwrap();

        let rankings = rank_residuals(&residuals, 1);
        assert_eq!(rankings.above.len(), 1);
        assert_eq!(rankings.above[0].point.x, 2.0);
        assert_eq!(rankings.below.len(), 1);
        assert_eq!(rankings.below[0].point.x, 3.0);

        let rankings = rank_residuals(&residuals, 10);
        assert_eq!(rankings.above.len(), 2);
        assert_eq!(rankings.below.len(), 1);
    }
}
