//! Request/response exploration state.
//!
//! A [`Session`] owns the unperturbed dataset and the current settings. Every
//! setter rebuilds the noisy dataset, refits, and replaces the current result
//! before returning. A setter that fails leaves the session untouched.
//!
//! Each refit starts from zeros rather than the previous optimum, so the
//! current result depends only on the current settings.

use log::debug;

use crate::data::add_gaussian_noise;
use crate::domain::{Dataset, FitConfig, FitResult, LossKind, ModelFamily};
use crate::error::FitError;
use crate::fit::{fit, validate_model};

#[derive(Debug, Clone)]
pub struct Session {
    base: Dataset,
    config: FitConfig,
    data: Dataset,
    fit: FitResult,
}

impl Session {
    /// Fit `base` (perturbed per `config`) once and start a session.
    pub fn new(base: Dataset, config: FitConfig) -> Result<Self, FitError> {
        let (data, fit) = compute(&base, &config)?;
        Ok(Self { base, config, data, fit })
    }

    pub fn current(&self) -> &FitResult {
        &self.fit
    }

    /// The (possibly noisy) data the current fit was made on.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    pub fn set_noise(&mut self, sigma: f64) -> Result<(), FitError> {
        self.update(|c| c.noise_sigma = sigma)
    }

    pub fn set_seed(&mut self, seed: u64) -> Result<(), FitError> {
        self.update(|c| c.seed = seed)
    }

    /// Switch to a polynomial of `degree`.
    pub fn set_degree(&mut self, degree: usize) -> Result<(), FitError> {
        self.update(|c| c.model = ModelFamily::Polynomial { degree })
    }

    pub fn set_affine(&mut self) -> Result<(), FitError> {
        self.update(|c| c.model = ModelFamily::Affine)
    }

    pub fn set_loss(&mut self, loss: LossKind) -> Result<(), FitError> {
        self.update(|c| c.loss = loss)
    }

    /// Plot of the current fit followed by a one-line summary.
    pub fn render(&self, width: usize, height: usize) -> String {
        let plot = crate::plot::render_ascii_plot(&self.data, &self.fit, width, height, None);
        format!("{plot}{}\n", crate::report::format_fit_line(&self.fit, &self.config))
    }

    fn update(&mut self, change: impl FnOnce(&mut FitConfig)) -> Result<(), FitError> {
        let mut next = self.config.clone();
        change(&mut next);
        let (data, fit) = compute(&self.base, &next)?;
        debug!(
            "session refit: {} / {} -> loss={:.6e}",
            fit.model.display_name(),
            fit.loss,
            fit.loss_value
        );
        self.config = next;
        self.data = data;
        self.fit = fit;
        Ok(())
    }
}

fn compute(base: &Dataset, config: &FitConfig) -> Result<(Dataset, FitResult), FitError> {
    validate_model(base, config.model)?;
    let data = add_gaussian_noise(base, config.noise_sigma, config.seed)?;
    let initial = vec![0.0; config.model.param_count()];
    let fit = fit(&data, config.model, &config.loss, &initial, &config.options)?;
    Ok((data, fit))
}
