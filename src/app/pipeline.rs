//! Shared "fit pipeline" logic used by the subcommands and the explore prompt.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! dataset (CSV or built-in) -> noise -> fit -> residuals -> rankings

use std::path::Path;

use log::info;

use crate::data::{add_gaussian_noise, tutorial_dataset};
use crate::domain::{Dataset, FitConfig, FitResult, PointResidual};
use crate::error::AppError;
use crate::fit::{fit, validate_model};
use crate::io::ingest::load_dataset;
use crate::report::Rankings;

/// All computed outputs of a single `lsq fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The data actually fitted (noise already applied).
    pub data: Dataset,
    pub fit: FitResult,
    pub residuals: Vec<PointResidual>,
    pub rankings: Rankings,
}

/// The CSV dataset when a path is given, otherwise the built-in line.
pub fn load_base_dataset(csv_path: Option<&Path>) -> Result<Dataset, AppError> {
    match csv_path {
        Some(path) => load_dataset(path),
        None => {
            let data = tutorial_dataset()?;
            info!("using built-in y = 5x + 3 dataset ({} points)", data.len());
            Ok(data)
        }
    }
}

/// Load the configured dataset and apply the configured noise.
pub fn load_data(config: &FitConfig) -> Result<Dataset, AppError> {
    let base = load_base_dataset(config.csv_path.as_deref())?;
    let data = add_gaussian_noise(&base, config.noise_sigma, config.seed)?;
    if config.noise_sigma > 0.0 {
        info!("added gaussian noise: sigma={} seed={}", config.noise_sigma, config.seed);
    }
    Ok(data)
}

/// Execute the full fitting pipeline and return the computed outputs.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let data = load_data(config)?;
    run_fit_on(data, config)
}

/// Execute the fitting pipeline on already-prepared data.
pub fn run_fit_on(data: Dataset, config: &FitConfig) -> Result<RunOutput, AppError> {
    validate_model(&data, config.model)?;
    let fit = fit(
        &data,
        config.model,
        &config.loss,
        &config.initial_guess(),
        &config.options,
    )?;
    info!(
        "fitted {} with {} loss: loss={:.6e} ({:?})",
        fit.model.display_name(),
        fit.loss,
        fit.loss_value,
        fit.status
    );

    let residuals = crate::report::compute_residuals(&data, &fit)?;
    let rankings = crate::report::rank_residuals(&residuals, config.top_n);

    Ok(RunOutput {
        data,
        fit,
        residuals,
        rankings,
    })
}
