//! Loss functions: residual aggregation over a dataset.
//!
//! A loss maps `(model, params, dataset)` to a scalar. The three built-in
//! aggregations are:
//!
//! - `sum`: `Σ (y_i - ŷ_i)`, unbounded below
//! - `absolute`: `Σ |y_i - ŷ_i|`
//! - `squared`: `Σ (y_i - ŷ_i)²`
//!
//! Custom aggregations implement [`LossFunction`]; any
//! `Fn(ModelFamily, &[f64], &Dataset) -> f64` closure already does.

use crate::domain::{Dataset, LossKind, ModelFamily, PointResidual};
use crate::models::predict;

/// A scalar objective over model parameters and observations.
pub trait LossFunction {
    /// Label recorded in [`crate::domain::FitResult::loss`].
    fn name(&self) -> String;

    fn loss(&self, model: ModelFamily, params: &[f64], data: &Dataset) -> f64;
}

impl LossFunction for LossKind {
    fn name(&self) -> String {
        self.display_name().to_string()
    }

    fn loss(&self, model: ModelFamily, params: &[f64], data: &Dataset) -> f64 {
        let residuals = residuals(model, params, data);
        match self {
            LossKind::Sum => residuals.sum(),
            LossKind::Absolute => residuals.map(f64::abs).sum(),
            LossKind::Squared => residuals.map(|r| r * r).sum(),
        }
    }
}

impl<F> LossFunction for F
where
    F: Fn(ModelFamily, &[f64], &Dataset) -> f64,
{
    fn name(&self) -> String {
        "custom".to_string()
    }

    fn loss(&self, model: ModelFamily, params: &[f64], data: &Dataset) -> f64 {
        self(model, params, data)
    }
}

/// Residuals `y_i - ŷ_i`, lazily, in dataset order.
pub fn residuals<'a>(
    model: ModelFamily,
    params: &'a [f64],
    data: &'a Dataset,
) -> impl Iterator<Item = f64> + 'a {
    data.points().iter().map(move |p| p.y - predict(model, params, p.x))
}

/// Fitted value and residual for every observation.
pub fn point_residuals(model: ModelFamily, params: &[f64], data: &Dataset) -> Vec<PointResidual> {
    data.points()
        .iter()
        .map(|&point| {
            let y_fit = predict(model, params, point.x);
            PointResidual {
                point,
                y_fit,
                residual: point.y - y_fit,
            }
        })
        .collect()
}
