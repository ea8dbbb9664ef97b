//! Adapter that exposes `(model, loss, dataset)` as an `argmin` problem.

use argmin::core::{CostFunction, Error};

use crate::domain::{Dataset, ModelFamily};
use crate::error::FitError;
use crate::loss::LossFunction;

/// Bridges a [`LossFunction`] to `argmin`'s [`CostFunction`].
///
/// A non-finite loss is raised as [`FitError::NonFiniteLoss`] so the run stops
/// instead of letting NaN poison the simplex ordering. The runner recovers the
/// original variant from the boxed `argmin` error.
pub struct LossProblem<'a, L: ?Sized> {
    pub model: ModelFamily,
    pub loss: &'a L,
    pub data: &'a Dataset,
}

impl<'a, L: LossFunction + ?Sized> LossProblem<'a, L> {
    pub fn new(model: ModelFamily, loss: &'a L, data: &'a Dataset) -> Self {
        Self { model, loss, data }
    }
}

impl<L: LossFunction + ?Sized> CostFunction for LossProblem<'_, L> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.loss.loss(self.model, params, self.data);
        if !value.is_finite() {
            return Err(FitError::NonFiniteLoss {
                value,
                params: params.clone(),
            }
            .into());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LossKind;

    #[test]
    fn cost_matches_loss() {
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 3.0)]).unwrap();
        let problem = LossProblem::new(ModelFamily::Affine, &LossKind::Absolute, &data);
        assert_eq!(problem.cost(&vec![2.0, 0.0]).unwrap(), 2.0);
    }

    #[test]
    fn overflowing_cost_is_an_error() {
        let data = Dataset::from_pairs(&[(1e200, 0.0)]).unwrap();
        let problem = LossProblem::new(ModelFamily::Affine, &LossKind::Squared, &data);
        let err = problem.cost(&vec![1e200, 0.0]).unwrap_err();
        assert!(matches!(FitError::from(err), FitError::NonFiniteLoss { .. }));
    }
}
