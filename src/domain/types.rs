//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// A single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// An ordered, immutable set of observations.
///
/// All coordinates are finite. Perturbing a dataset (see
/// [`crate::data::add_gaussian_noise`]) produces a new `Dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    /// Build a dataset, rejecting non-finite coordinates.
    ///
    /// An empty dataset is allowed here; fitting rejects it.
    pub fn new(points: Vec<Point>) -> Result<Self, FitError> {
        for (index, p) in points.iter().enumerate() {
            if !p.x.is_finite() {
                return Err(FitError::NonFiniteInput { what: "x", index, value: p.x });
            }
            if !p.y.is_finite() {
                return Err(FitError::NonFiniteInput { what: "y", index, value: p.y });
            }
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, FitError> {
        Self::new(pairs.iter().map(|&(x, y)| Point { x, y }).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    /// `(x_min, x_max, y_min, y_max)`, or `None` for an empty dataset.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let mut b = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            b.0 = b.0.min(p.x);
            b.1 = b.1.max(p.x);
            b.2 = b.2.min(p.y);
            b.3 = b.3.max(p.y);
        }
        Some(b)
    }
}

/// Parametric model family.
///
/// Parameter layout:
/// - `Affine`: `[m, b]` for `y = m·x + b`
/// - `Polynomial { degree: d }`: `[c0, c1, ..., cd]` for `y = Σ c_i x^i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ModelFamily {
    Affine,
    Polynomial { degree: usize },
}

impl ModelFamily {
    pub fn param_count(self) -> usize {
        match self {
            ModelFamily::Affine => 2,
            ModelFamily::Polynomial { degree } => degree.saturating_add(1),
        }
    }

    pub fn display_name(self) -> String {
        match self {
            ModelFamily::Affine => "affine".to_string(),
            ModelFamily::Polynomial { degree } => format!("poly(d={degree})"),
        }
    }

    /// Human-readable parameter names, in parameter order.
    pub fn param_names(self) -> Vec<String> {
        match self {
            ModelFamily::Affine => vec!["m".to_string(), "b".to_string()],
            ModelFamily::Polynomial { degree } => (0..=degree).map(|i| format!("c{i}")).collect(),
        }
    }
}

/// Model family selector on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    Affine,
    Poly,
}

impl ModelSpec {
    pub fn to_family(self, degree: usize) -> ModelFamily {
        match self {
            ModelSpec::Affine => ModelFamily::Affine,
            ModelSpec::Poly => ModelFamily::Polynomial { degree },
        }
    }
}

/// Built-in residual aggregations.
///
/// `Sum` is not bounded below: pushing the model far above every observation
/// makes every residual negative and the total arbitrarily small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LossKind {
    /// `Σ r_i`
    Sum,
    /// `Σ |r_i|`
    Absolute,
    /// `Σ r_i²`
    Squared,
}

impl LossKind {
    pub const ALL: [LossKind; 3] = [LossKind::Sum, LossKind::Absolute, LossKind::Squared];

    pub fn display_name(self) -> &'static str {
        match self {
            LossKind::Sum => "sum",
            LossKind::Absolute => "absolute",
            LossKind::Squared => "squared",
        }
    }
}

/// How the minimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    /// The simplex collapsed below the configured cost tolerance.
    Converged,
    /// The iteration cap was hit first; parameters are a best effort.
    MaxIterations,
}

impl FitStatus {
    pub fn is_converged(self) -> bool {
        self == FitStatus::Converged
    }
}

/// Output of a single fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelFamily,
    /// Label of the loss that was minimized (`LossFunction::name`).
    pub loss: String,
    pub params: Vec<f64>,
    pub loss_value: f64,
    pub status: FitStatus,
    pub iterations: u64,
    pub cost_evals: u64,
}

/// Minimizer knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    /// Iteration cap.
    pub max_iters: u64,
    /// Stop once the standard deviation of the simplex costs drops below this.
    pub sd_tolerance: f64,
    /// Absolute step for initial-simplex coordinates that are (near) zero.
    pub zero_step: f64,
    /// Relative step for non-zero initial-simplex coordinates.
    pub relative_step: f64,
    /// Fresh-simplex restarts after a converged run.
    pub restarts: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iters: 5_000,
            sd_tolerance: 1e-12,
            zero_step: 0.25,
            relative_step: 0.05,
            restarts: 3,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Optional `x,y` CSV; the built-in `y = 5x + 3` dataset is used otherwise.
    pub csv_path: Option<PathBuf>,
    pub model: ModelFamily,
    pub loss: LossKind,
    /// Gaussian noise standard deviation added to every `y` before fitting.
    pub noise_sigma: f64,
    pub seed: u64,
    /// Initial guess; zeros when absent.
    pub initial_params: Option<Vec<f64>>,
    pub options: FitOptions,

    /// Rows per side in the residual rankings.
    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_json: Option<PathBuf>,
    pub export_csv: Option<PathBuf>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            model: ModelFamily::Affine,
            loss: LossKind::Squared,
            noise_sigma: 0.0,
            seed: 42,
            initial_params: None,
            options: FitOptions::default(),
            top_n: 3,
            plot: true,
            plot_width: 72,
            plot_height: 20,
            export_json: None,
            export_csv: None,
        }
    }
}

impl FitConfig {
    /// The configured initial guess, or zeros sized for the model.
    pub fn initial_guess(&self) -> Vec<f64> {
        self.initial_params
            .clone()
            .unwrap_or_else(|| vec![0.0; self.model.param_count()])
    }
}

/// A per-point fitted value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResidual {
    pub point: Point,
    pub y_fit: f64,
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_rejects_non_finite() {
        let err = Dataset::from_pairs(&[(0.0, 1.0), (1.0, f64::NAN)]).unwrap_err();
        assert!(matches!(err, FitError::NonFiniteInput { what: "y", index: 1, .. }));
    }

    #[test]
    fn param_counts() {
        assert_eq!(ModelFamily::Affine.param_count(), 2);
        assert_eq!(ModelFamily::Polynomial { degree: 3 }.param_count(), 4);
        assert_eq!(ModelFamily::Polynomial { degree: 2 }.param_names(), vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn fit_result_json_shape() {
        let fit = FitResult {
            model: ModelFamily::Polynomial { degree: 2 },
            loss: "squared".to_string(),
            params: vec![1.0, 2.0, 3.0],
            loss_value: 0.5,
            status: FitStatus::MaxIterations,
            iterations: 10,
            cost_evals: 25,
        };
        let json = serde_json::to_string(&fit).unwrap();
        assert!(json.contains(r#""kind":"polynomial""#));
        assert!(json.contains(r#""status":"max_iterations""#));
        let back: FitResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fit);
    }
}
