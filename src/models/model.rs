//! Model evaluation for the affine and polynomial families.
//!
//! The fitter relies on two primitive operations:
//! - fill a design row for a given `x` (for the closed-form least-squares solve)
//! - predict `y(x)` given parameters (for residuals, losses and plots)

use crate::domain::ModelFamily;

/// Fill a design row for the given model family.
///
/// Columns follow the parameter layout of [`ModelFamily`]:
/// affine is `[x, 1]`, polynomial is `[1, x, x², ...]`.
///
/// # Panics
/// Panics if `out` does not have length `model.param_count()`.
pub fn fill_design_row(model: ModelFamily, x: f64, out: &mut [f64]) {
    match model {
        ModelFamily::Affine => {
            out[0] = x;
            out[1] = 1.0;
        }
        ModelFamily::Polynomial { .. } => {
            let mut power = 1.0;
            for slot in out.iter_mut() {
                *slot = power;
                power *= x;
            }
        }
    }
}

/// Predict `y(x)`.
///
/// `params` must have length `model.param_count()`; the fitter validates this
/// before any evaluation happens.
pub fn predict(model: ModelFamily, params: &[f64], x: f64) -> f64 {
    match model {
        ModelFamily::Affine => params[0] * x + params[1],
        // Horner: c0 + x(c1 + x(c2 + ...))
        ModelFamily::Polynomial { .. } => params.iter().rev().fold(0.0, |acc, &c| acc * x + c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_prediction() {
        assert_eq!(predict(ModelFamily::Affine, &[5.0, 3.0], 2.0), 13.0);
    }

    #[test]
    fn polynomial_matches_power_sum() {
        let params = [1.0, -2.0, 0.5, 3.0];
        let model = ModelFamily::Polynomial { degree: 3 };
        for &x in &[-2.0, -0.5, 0.0, 1.0, 4.0] {
            let expected: f64 = params
                .iter()
                .enumerate()
                .map(|(i, c)| c * f64::powi(x, i as i32))
                .sum();
            assert!((predict(model, &params, x) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn design_row_dot_params_is_prediction() {
        let model = ModelFamily::Polynomial { degree: 2 };
        let params = [0.5, 1.5, -1.0];
        let mut row = [0.0; 3];
        fill_design_row(model, 3.0, &mut row);
        let dot: f64 = row.iter().zip(params.iter()).map(|(a, b)| a * b).sum();
        assert!((dot - predict(model, &params, 3.0)).abs() < 1e-12);

        let mut row = [0.0; 2];
        fill_design_row(ModelFamily::Affine, 3.0, &mut row);
        assert_eq!(row, [3.0, 1.0]);
    }
}
