//! Curve fitting by numerical minimization.
//!
//! Given:
//! - observations `(x_i, y_i)`
//! - a model family (affine or polynomial)
//! - a loss (any [`LossFunction`])
//! - an initial guess
//!
//! we run a Nelder–Mead simplex search (from `argmin`) on the loss and return
//! the best parameters found together with the loss value and how the search
//! stopped.
//!
//! Nelder–Mead can stall on kinks (e.g. the absolute loss), so a converged run
//! is restarted from its best vertex with a fresh simplex until a restart stops
//! improving the loss or `FitOptions::restarts` is exhausted. Runs that hit the
//! iteration cap are never restarted: they are reported as
//! [`FitStatus::MaxIterations`].

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use log::{debug, warn};

use crate::domain::{Dataset, FitOptions, FitResult, FitStatus, ModelFamily};
use crate::error::FitError;
use crate::fit::problem::LossProblem;
use crate::fit::simplex::initial_simplex;
use crate::loss::LossFunction;

/// Result of one Nelder–Mead run.
#[derive(Debug, Clone)]
struct RunOutcome {
    params: Vec<f64>,
    cost: f64,
    status: FitStatus,
    iterations: u64,
    cost_evals: u64,
}

/// Fit `model` to `data` by minimizing `loss`, starting from `initial`.
///
/// Deterministic: identical inputs produce identical results.
///
/// # Errors
/// - [`FitError::EmptyDataset`] / [`FitError::DegreeTooHigh`] /
///   [`FitError::ParamCountMismatch`] / [`FitError::NonFiniteInput`] for bad
///   inputs (no search is attempted)
/// - [`FitError::InvalidOptions`] for unusable minimizer settings
/// - [`FitError::NonFiniteLoss`] if the loss overflows or turns NaN during the search
pub fn fit<L: LossFunction + ?Sized>(
    data: &Dataset,
    model: ModelFamily,
    loss: &L,
    initial: &[f64],
    opts: &FitOptions,
) -> Result<FitResult, FitError> {
    validate_inputs(data, model, initial)?;
    validate_options(opts)?;

    let problem = LossProblem::new(model, loss, data);
    let mut best = run_once(&problem, initial, opts)?;
    let mut iterations = best.iterations;
    let mut cost_evals = best.cost_evals;

    let mut restarts = 0;
    while best.status.is_converged() && restarts < opts.restarts {
        restarts += 1;
        let next = run_once(&problem, &best.params, opts)?;
        iterations += next.iterations;
        cost_evals += next.cost_evals;

        let improvement = best.cost - next.cost;
        debug!(
            "restart {restarts}: cost {:.6e} -> {:.6e} ({:?})",
            best.cost, next.cost, next.status
        );
        let capped = !next.status.is_converged();
        let stop = capped || improvement <= opts.sd_tolerance;
        if next.cost <= best.cost {
            best = next;
        } else if capped {
            best.status = FitStatus::MaxIterations;
        }
        if stop {
            break;
        }
    }

    if !best.status.is_converged() {
        warn!(
            "{} fit with {} loss stopped at the iteration cap ({} iterations); loss={:.6e}",
            model.display_name(),
            loss.name(),
            opts.max_iters,
            best.cost
        );
    }

    Ok(FitResult {
        model,
        loss: loss.name(),
        params: best.params,
        loss_value: best.cost,
        status: best.status,
        iterations,
        cost_evals,
    })
}

fn run_once<L: LossFunction + ?Sized>(
    problem: &LossProblem<'_, L>,
    start: &[f64],
    opts: &FitOptions,
) -> Result<RunOutcome, FitError> {
    let vertices = initial_simplex(start, opts);
    // argmin unwraps cost errors while initializing the simplex.
    for v in &vertices {
        problem.cost(v)?;
    }

    let solver = NelderMead::new(vertices).with_sd_tolerance(opts.sd_tolerance)?;
    let executor = Executor::new(LossProblem::new(problem.model, problem.loss, problem.data), solver)
        .configure(|state| state.max_iters(opts.max_iters));

    let result = executor.run()?;
    let state = result.state();

    let params = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| FitError::Minimizer {
            text: "minimizer returned no parameters".to_string(),
        })?;
    let cost = state.get_best_cost();
    if !cost.is_finite() {
        return Err(FitError::NonFiniteLoss { value: cost, params });
    }

    let status = match state.get_termination_status() {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => FitStatus::Converged,
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => FitStatus::MaxIterations,
        other => {
            return Err(FitError::Minimizer {
                text: format!("unexpected termination: {other:?}"),
            });
        }
    };

    let cost_evals = state.get_func_counts().get("cost_count").copied().unwrap_or(0);
    debug!(
        "nelder-mead: {:?} after {} iterations, {} cost evals, cost={:.6e}",
        status,
        state.get_iter(),
        cost_evals,
        cost
    );

    Ok(RunOutcome {
        params,
        cost,
        status,
        iterations: state.get_iter(),
        cost_evals,
    })
}

/// Check that `model` can be fitted to `data` at all.
///
/// A polynomial needs more points than its degree. Callers that size buffers
/// from `model.param_count()` run this first.
pub fn validate_model(data: &Dataset, model: ModelFamily) -> Result<(), FitError> {
    if data.is_empty() {
        return Err(FitError::EmptyDataset);
    }
    if let ModelFamily::Polynomial { degree } = model {
        if degree >= data.len() {
            return Err(FitError::DegreeTooHigh { degree, n: data.len() });
        }
    }
    Ok(())
}

fn validate_inputs(data: &Dataset, model: ModelFamily, initial: &[f64]) -> Result<(), FitError> {
    validate_model(data, model)?;
    let expected = model.param_count();
    if initial.len() != expected {
        return Err(FitError::ParamCountMismatch {
            model: model.display_name(),
            expected,
            actual: initial.len(),
        });
    }
    if let Some((index, &value)) = initial.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(FitError::NonFiniteInput {
            what: "initial parameter",
            index,
            value,
        });
    }
    Ok(())
}

fn validate_options(opts: &FitOptions) -> Result<(), FitError> {
    let invalid = |reason: &str| {
        Err(FitError::InvalidOptions {
            reason: reason.to_string(),
        })
    };
    if opts.max_iters == 0 {
        return invalid("max_iters must be >= 1");
    }
    if !(opts.sd_tolerance.is_finite() && opts.sd_tolerance >= 0.0) {
        return invalid("sd_tolerance must be finite and >= 0");
    }
    if !(opts.zero_step.is_finite() && opts.zero_step > 0.0) {
        return invalid("zero_step must be finite and > 0");
    }
    if !(opts.relative_step.is_finite() && opts.relative_step > 0.0) {
        return invalid("relative_step must be finite and > 0");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LossKind;

    fn line_5x_plus_3() -> Dataset {
        let pairs: Vec<(f64, f64)> = (0..=12)
            .map(|i| {
                let x = i as f64 * 0.5;
                (x, 5.0 * x + 3.0)
            })
            .collect();
        Dataset::from_pairs(&pairs).unwrap()
    }

    #[test]
    fn squared_loss_recovers_line() {
        let data = line_5x_plus_3();
        let fit = fit(&data, ModelFamily::Affine, &LossKind::Squared, &[0.0, 0.0], &FitOptions::default()).unwrap();
        assert_eq!(fit.status, FitStatus::Converged);
        assert!((fit.params[0] - 5.0).abs() < 1e-3, "slope {}", fit.params[0]);
        assert!((fit.params[1] - 3.0).abs() < 1e-3, "intercept {}", fit.params[1]);
        assert!(fit.loss_value < 1e-6);
        assert_eq!(fit.loss, "squared");
    }

    #[test]
    fn absolute_loss_reaches_zero_on_exact_data() {
        let data = line_5x_plus_3();
        let fit = fit(&data, ModelFamily::Affine, &LossKind::Absolute, &[0.0, 0.0], &FitOptions::default()).unwrap();
        assert!(fit.loss_value < 1e-3, "absolute loss {}", fit.loss_value);
    }

    #[test]
    fn sum_loss_diverges() {
        let data = line_5x_plus_3();
        let opts = FitOptions {
            max_iters: 100,
            ..FitOptions::default()
        };
        let fit = fit(&data, ModelFamily::Affine, &LossKind::Sum, &[0.0, 0.0], &opts).unwrap();
        assert_eq!(fit.status, FitStatus::MaxIterations);
        assert!(fit.loss_value < -1e6, "sum loss {}", fit.loss_value);
    }

    #[test]
    fn fitting_is_deterministic() {
        let data = line_5x_plus_3();
        let model = ModelFamily::Polynomial { degree: 2 };
        let a = fit(&data, model, &LossKind::Squared, &[1.0, 1.0, 1.0], &FitOptions::default()).unwrap();
        let b = fit(&data, model, &LossKind::Squared, &[1.0, 1.0, 1.0], &FitOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quadratic_recovered_from_zero_guess() {
        let pairs: Vec<(f64, f64)> = (-5..=5)
            .map(|i| {
                let x = i as f64 * 0.4;
                (x, 1.0 - 2.0 * x + 0.5 * x * x)
            })
            .collect();
        let data = Dataset::from_pairs(&pairs).unwrap();
        let model = ModelFamily::Polynomial { degree: 2 };
        let fit = fit(&data, model, &LossKind::Squared, &[0.0; 3], &FitOptions::default()).unwrap();
        for (got, want) in fit.params.iter().zip([1.0, -2.0, 0.5]) {
            assert!((got - want).abs() < 1e-3, "got {:?}", fit.params);
        }
    }

    #[test]
    fn rejects_bad_inputs() {
        let data = line_5x_plus_3();
        let opts = FitOptions::default();

        let empty = Dataset::new(Vec::new()).unwrap();
        assert_eq!(
            fit(&empty, ModelFamily::Affine, &LossKind::Squared, &[0.0, 0.0], &opts).unwrap_err(),
            FitError::EmptyDataset
        );

        let err = fit(&data, ModelFamily::Polynomial { degree: 13 }, &LossKind::Squared, &[0.0; 14], &opts).unwrap_err();
        assert_eq!(err, FitError::DegreeTooHigh { degree: 13, n: 13 });

        let err = fit(&data, ModelFamily::Affine, &LossKind::Squared, &[0.0; 3], &opts).unwrap_err();
        assert!(matches!(err, FitError::ParamCountMismatch { expected: 2, actual: 3, .. }));

        let err = fit(&data, ModelFamily::Affine, &LossKind::Squared, &[0.0, f64::NAN], &opts).unwrap_err();
        assert!(matches!(err, FitError::NonFiniteInput { index: 1, .. }));

        let bad_opts = FitOptions {
            max_iters: 0,
            ..FitOptions::default()
        };
        let err = fit(&data, ModelFamily::Affine, &LossKind::Squared, &[0.0, 0.0], &bad_opts).unwrap_err();
        assert!(matches!(err, FitError::InvalidOptions { .. }));
    }

    #[test]
    fn overflowing_loss_is_reported() {
        let data = Dataset::from_pairs(&[(1e300, 0.0), (-1e300, 1.0)]).unwrap();
        let err = fit(&data, ModelFamily::Affine, &LossKind::Squared, &[1e10, 0.0], &FitOptions::default())
            .unwrap_err();
        assert!(matches!(err, FitError::NonFiniteLoss { .. }), "{err:?}");
    }

    #[test]
    fn overflowing_starting_vertex_is_reported() {
        // Vertex 0 is finite; the c2 vertex overflows.
        let data = Dataset::from_pairs(&[(0.0, 1.0), (1.0, 2.0), (2.0, 3.0), (1e200, 4.0)]).unwrap();
        let model = ModelFamily::Polynomial { degree: 2 };
        let err = fit(&data, model, &LossKind::Squared, &[0.0; 3], &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::NonFiniteLoss { .. }), "{err:?}");
    }
}
