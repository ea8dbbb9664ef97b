//! Side-by-side fits of the built-in losses on one dataset.
//!
//! Every loss is attempted; a failure (e.g. the plain sum overflowing while it
//! runs away) is kept as that row's outcome instead of aborting the others.

use log::{info, warn};

use crate::domain::{Dataset, FitOptions, FitResult, LossKind, ModelFamily};
use crate::error::FitError;
use crate::fit::fitter::fit;
use crate::math::closed_form_fit;

/// One loss and how its fit went.
#[derive(Debug, Clone)]
pub struct LossRow {
    pub loss: LossKind,
    pub outcome: Result<FitResult, FitError>,
}

#[derive(Debug, Clone)]
pub struct LossComparison {
    pub model: ModelFamily,
    pub rows: Vec<LossRow>,
    /// Exact squared-loss minimizer for reference.
    pub closed_form: Result<Vec<f64>, FitError>,
}

/// Fit `model` under every [`LossKind`] from the same starting point.
pub fn compare_losses(data: &Dataset, model: ModelFamily, initial: &[f64], opts: &FitOptions) -> LossComparison {
    let rows = LossKind::ALL
        .iter()
        .map(|&loss| {
            let outcome = fit(data, model, &loss, initial, opts);
            if let Err(e) = &outcome {
                warn!("{} loss fit failed: {e}", loss.display_name());
            }
            LossRow { loss, outcome }
        })
        .collect();

    let closed_form = closed_form_fit(data, model);
    info!("compared {} losses for {}", LossKind::ALL.len(), model.display_name());

    LossComparison {
        model,
        rows,
        closed_form,
    }
}
