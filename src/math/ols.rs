//! Closed-form least squares.
//!
//! Both model families are linear in their parameters, so the squared loss
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! has an exact solution. We use it as a reference for what the numerical
//! minimizer should find under the squared loss.
//!
//! Implementation choices:
//! - We solve with SVD so that tall design matrices (more rows than columns)
//!   are handled directly. (Nalgebra's `QR::solve` is intended for square
//!   systems and will panic for non-square matrices.)
//! - High-degree polynomial design matrices are badly conditioned, so we retry
//!   with progressively looser singular-value cutoffs before giving up.

use nalgebra::{DMatrix, DVector};

use crate::domain::{Dataset, ModelFamily};
use crate::error::FitError;
use crate::models::fill_design_row;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Exact squared-loss parameters for `model` on `data`, in the model's parameter order.
///
/// # Errors
/// - [`FitError::EmptyDataset`] for no points
/// - [`FitError::Singular`] when there are fewer points than parameters or
///   the design matrix is numerically rank deficient
pub fn closed_form_fit(data: &Dataset, model: ModelFamily) -> Result<Vec<f64>, FitError> {
    if data.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    let n = data.len();
    let k = model.param_count();
    if n < k {
        return Err(FitError::Singular { n, k });
    }

    let mut x = DMatrix::<f64>::zeros(n, k);
    let mut y = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; k];
    for (i, p) in data.points().iter().enumerate() {
        fill_design_row(model, p.x, &mut row);
        for (j, &v) in row.iter().enumerate() {
            x[(i, j)] = v;
        }
        y[i] = p.y;
    }

    // Rank check: all singular values must be meaningfully non-zero.
    let singular = x.singular_values();
    let s_max = singular.max();
    if !(s_max > 0.0) || singular.iter().any(|&s| s <= s_max * 1e-12) {
        return Err(FitError::Singular { n, k });
    }

    let beta = solve_least_squares(&x, &y).ok_or(FitError::Singular { n, k })?;
    Ok(beta.iter().copied().collect())
}
