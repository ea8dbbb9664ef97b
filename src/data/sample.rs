//! Toy datasets and noise generation.
//!
//! The lessons start from exact data on `y = 5x + 3` and then perturb it with
//! seeded Gaussian noise, so every run with the same settings is reproducible.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Point};
use crate::error::FitError;

/// Slope of the built-in tutorial line.
pub const TUTORIAL_SLOPE: f64 = 5.0;
/// Intercept of the built-in tutorial line.
pub const TUTORIAL_INTERCEPT: f64 = 3.0;

/// Exact samples of `y = slope·x + intercept` at `x = x_min, x_min + step, ..., x_max`.
pub fn line_dataset(slope: f64, intercept: f64, x_min: f64, x_max: f64, step: f64) -> Result<Dataset, FitError> {
    if !(x_min.is_finite() && x_max.is_finite() && step.is_finite() && step > 0.0 && x_max >= x_min) {
        return Err(FitError::InvalidGrid {
            reason: format!("invalid sample range: x=[{x_min}, {x_max}] step={step}"),
        });
    }

    // Count steps up front so accumulated rounding never drops the last point.
    let n = ((x_max - x_min) / step + 1e-9).floor() as usize + 1;
    let points = (0..n)
        .map(|i| {
            let x = x_min + step * i as f64;
            Point {
                x,
                y: slope * x + intercept,
            }
        })
        .collect();
    Dataset::new(points)
}

/// `y = 5x + 3` sampled at `x = 0, 0.5, ..., 6` (13 points).
pub fn tutorial_dataset() -> Result<Dataset, FitError> {
    line_dataset(TUTORIAL_SLOPE, TUTORIAL_INTERCEPT, 0.0, 6.0, 0.5)
}

/// Return a copy of `data` with independent `N(0, sigma²)` noise added to every `y`.
///
/// `sigma = 0` returns an identical copy; `x` values are never touched.
pub fn add_gaussian_noise(data: &Dataset, sigma: f64, seed: u64) -> Result<Dataset, FitError> {
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(FitError::InvalidNoise { sigma });
    }
    if sigma == 0.0 {
        return Ok(data.clone());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).map_err(|_| FitError::InvalidNoise { sigma })?;

    let points = data
        .points()
        .iter()
        .map(|p| Point {
            x: p.x,
            y: p.y + normal.sample(&mut rng),
        })
        .collect();
    Dataset::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_dataset_matches_line() {
        let data = tutorial_dataset().unwrap();
        assert_eq!(data.len(), 13);
        assert_eq!(data.points()[0], Point { x: 0.0, y: 3.0 });
        assert_eq!(data.points()[1], Point { x: 0.5, y: 5.5 });
        assert_eq!(data.points()[12], Point { x: 6.0, y: 33.0 });
    }

    #[test]
    fn line_dataset_includes_endpoint() {
        let data = line_dataset(2.0, 1.0, 0.0, 1.0, 0.1).unwrap();
        assert_eq!(data.len(), 11);
        assert!((data.points()[10].x - 1.0).abs() < 1e-12);
        assert!(line_dataset(1.0, 0.0, 1.0, 0.0, 0.1).is_err());
        assert!(line_dataset(1.0, 0.0, 0.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn zero_noise_is_identity() {
        let data = tutorial_dataset().unwrap();
        assert_eq!(add_gaussian_noise(&data, 0.0, 7).unwrap(), data);
    }

    #[test]
    fn noise_is_reproducible_and_only_touches_y() {
        let data = tutorial_dataset().unwrap();
        let a = add_gaussian_noise(&data, 1.5, 11).unwrap();
        let b = add_gaussian_noise(&data, 1.5, 11).unwrap();
        let c = add_gaussian_noise(&data, 1.5, 12).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        for (orig, noisy) in data.points().iter().zip(a.points()) {
            assert_eq!(orig.x, noisy.x);
        }
        assert!(data.points().iter().zip(a.points()).any(|(o, n)| o.y != n.y));
    }

    #[test]
    fn negative_sigma_rejected() {
        let data = tutorial_dataset().unwrap();
        assert_eq!(
            add_gaussian_noise(&data, -1.0, 0).unwrap_err(),
            FitError::InvalidNoise { sigma: -1.0 }
        );
        assert!(add_gaussian_noise(&data, f64::NAN, 0).is_err());
    }
}
