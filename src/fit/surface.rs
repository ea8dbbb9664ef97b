//! Loss surface over a slope/intercept grid.
//!
//! For the affine model the loss is a function of two parameters, so it can be
//! tabulated on a regular `(m, b)` grid. The grid is what a 3D surface or
//! contour plot would draw; here we only compute it (and its extreme cells).
//!
//! Rows are independent, so they are evaluated in parallel.

use rayon::prelude::*;

use crate::domain::{Dataset, ModelFamily};
use crate::error::FitError;
use crate::loss::LossFunction;

/// Inclusive, evenly spaced axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAxis {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

impl GridAxis {
    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        Self { min, max, steps }
    }

    pub fn values(&self) -> Result<Vec<f64>, FitError> {
        lin_space(self.min, self.max, self.steps)
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCell {
    pub slope: f64,
    pub intercept: f64,
    pub loss: f64,
}

/// Tabulated affine loss. `values[i][j]` is the loss at `(slopes[i], intercepts[j])`.
#[derive(Debug, Clone)]
pub struct LossSurface {
    pub loss: String,
    pub slopes: Vec<f64>,
    pub intercepts: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl LossSurface {
    /// Cell with the smallest loss (ties: first in row-major order).
    pub fn min_cell(&self) -> SurfaceCell {
        self.extreme_cell(|candidate, best| candidate < best)
    }

    /// Cell with the largest loss (ties: first in row-major order).
    pub fn max_cell(&self) -> SurfaceCell {
        self.extreme_cell(|candidate, best| candidate > best)
    }

    /// Row-major iteration over all cells.
    pub fn cells(&self) -> impl Iterator<Item = SurfaceCell> + '_ {
        self.slopes.iter().enumerate().flat_map(move |(i, &slope)| {
            self.intercepts.iter().enumerate().map(move |(j, &intercept)| SurfaceCell {
                slope,
                intercept,
                loss: self.values[i][j],
            })
        })
    }

    fn extreme_cell(&self, better: impl Fn(f64, f64) -> bool) -> SurfaceCell {
        let mut cells = self.cells();
        // Grids always have at least 2x2 cells (validated on construction).
        let mut best = cells.next().unwrap_or(SurfaceCell {
            slope: f64::NAN,
            intercept: f64::NAN,
            loss: f64::NAN,
        });
        for c in cells {
            if better(c.loss, best.loss) {
                best = c;
            }
        }
        best
    }
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, FitError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(FitError::InvalidGrid {
            reason: format!("range must be finite with max > min (min={min}, max={max})"),
        });
    }
    if steps < 2 {
        return Err(FitError::InvalidGrid {
            reason: "steps must be >= 2".to_string(),
        });
    }

    let step = (max - min) / (steps as f64 - 1.0);
    Ok((0..steps).map(|i| min + step * i as f64).collect())
}

/// Evaluate `loss` for the affine model on every `(slope, intercept)` grid cell.
pub fn loss_surface<L: LossFunction + Sync + ?Sized>(
    data: &Dataset,
    loss: &L,
    slopes: GridAxis,
    intercepts: GridAxis,
) -> Result<LossSurface, FitError> {
    if data.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    let slopes = slopes.values()?;
    let intercepts = intercepts.values()?;

    let values: Vec<Vec<f64>> = slopes
        .par_iter()
        .map(|&m| {
            intercepts
                .iter()
                .map(|&b| loss.loss(ModelFamily::Affine, &[m, b], data))
                .collect()
        })
        .collect();

    // Row-major, so the reported cell is deterministic.
    for (i, row) in values.iter().enumerate() {
        if let Some(j) = row.iter().position(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteLoss {
                value: row[j],
                params: vec![slopes[i], intercepts[j]],
            });
        }
    }

    Ok(LossSurface {
        loss: loss.name(),
        slopes,
        intercepts,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LossKind;

    fn data() -> Dataset {
        let pairs: Vec<(f64, f64)> = (0..=12)
            .map(|i| {
                let x = i as f64 * 0.5;
                (x, 5.0 * x + 3.0)
            })
            .collect();
        Dataset::from_pairs(&pairs).unwrap()
    }

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(-1.0, 1.0, 5).unwrap();
        assert_eq!(v, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!(lin_space(1.0, 1.0, 5).is_err());
        assert!(lin_space(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn squared_surface_minimum_at_true_params() {
        let s = loss_surface(
            &data(),
            &LossKind::Squared,
            GridAxis::new(0.0, 10.0, 11),
            GridAxis::new(-2.0, 8.0, 11),
        )
        .unwrap();
        assert_eq!(s.values.len(), 11);
        assert_eq!(s.values[0].len(), 11);
        let min = s.min_cell();
        assert_eq!((min.slope, min.intercept), (5.0, 3.0));
        assert!(min.loss.abs() < 1e-9);
    }

    #[test]
    fn sum_surface_goes_large_negative() {
        let s = loss_surface(
            &data(),
            &LossKind::Sum,
            GridAxis::new(-10.0, 20.0, 31),
            GridAxis::new(-10.0, 20.0, 31),
        )
        .unwrap();
        let min = s.min_cell();
        let max = s.max_cell();
        // The plain sum is minimized at a grid corner, not near zero.
        assert!(min.loss < -300.0, "min {min:?}");
        assert_eq!((min.slope, min.intercept), (20.0, 20.0));
        assert!(max.loss > 300.0);
    }

    #[test]
    fn overflowing_cell_is_an_error() {
        let data = Dataset::from_pairs(&[(1e300, 0.0), (2.0, 1.0)]).unwrap();
        let err = loss_surface(
            &data,
            &LossKind::Squared,
            GridAxis::new(0.0, 1e300, 3),
            GridAxis::new(0.0, 1.0, 2),
        )
        .unwrap_err();
        match err {
            FitError::NonFiniteLoss { value, params } => {
                assert!(value.is_infinite());
                assert_eq!(params, vec![5e299, 0.0]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_rejected() {
        let empty = Dataset::new(Vec::new()).unwrap();
        let err = loss_surface(
            &empty,
            &LossKind::Squared,
            GridAxis::new(0.0, 1.0, 2),
            GridAxis::new(0.0, 1.0, 2),
        )
        .unwrap_err();
        assert_eq!(err, FitError::EmptyDataset);
    }
}
