//! Command-line parsing for the loss-minimization curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{LossKind, ModelSpec};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lsq", version, about = "Curve fitting by numerical loss minimization")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model under one loss, print diagnostics/residuals, and optionally plot/export.
    Fit(FitArgs),
    /// Fit the same data under every loss and compare with the closed-form solution.
    Compare(CompareArgs),
    /// Tabulate an affine loss over a slope/intercept grid.
    Surface(SurfaceArgs),
    /// Fit polynomial degrees 0..=D and pick one by BIC.
    Degrees(DegreesArgs),
    /// Plot a previously exported fit-result JSON.
    Plot(PlotArgs),
    /// Interactive prompt: change noise/degree/loss/seed and refit.
    Explore(ExploreArgs),
}

/// Where the observations come from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// `x,y` CSV file; the built-in y = 5x + 3 dataset is used when absent.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Standard deviation of Gaussian noise added to every y.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Model family selection.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model family.
    #[arg(long, value_enum, default_value_t = ModelSpec::Affine)]
    pub model: ModelSpec,

    /// Polynomial degree (only used with `--model poly`).
    #[arg(short = 'd', long, default_value_t = 2)]
    pub degree: usize,
}

/// Minimizer options.
#[derive(Debug, Args, Clone)]
pub struct SolverArgs {
    /// Initial parameters, comma separated (zeros when absent).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub init: Option<Vec<f64>>,

    /// Nelder–Mead iteration cap per run.
    #[arg(long, default_value_t = 5_000)]
    pub max_iters: u64,

    /// Fresh-simplex restarts after a converged run.
    #[arg(long, default_value_t = 3)]
    pub restarts: usize,
}

/// Options for `lsq fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Loss to minimize.
    #[arg(short = 'l', long, value_enum, default_value_t = LossKind::Squared)]
    pub loss: LossKind,

    /// Show the N largest residuals on each side of the fit.
    #[arg(long, default_value_t = 3)]
    pub top: usize,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the fit (and its data) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export per-point residuals to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

/// Options for `lsq compare`.
#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Options for `lsq surface`.
#[derive(Debug, Args, Clone)]
pub struct SurfaceArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Loss to tabulate.
    #[arg(short = 'l', long, value_enum, default_value_t = LossKind::Squared)]
    pub loss: LossKind,

    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub slope_min: f64,

    #[arg(long, default_value_t = 20.0, allow_hyphen_values = true)]
    pub slope_max: f64,

    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub intercept_min: f64,

    #[arg(long, default_value_t = 20.0, allow_hyphen_values = true)]
    pub intercept_max: f64,

    /// Grid points per axis.
    #[arg(long, default_value_t = 31)]
    pub steps: usize,

    /// Export the full grid to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

/// Options for `lsq degrees`.
#[derive(Debug, Args, Clone)]
pub struct DegreesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Highest degree to try.
    #[arg(long, default_value_t = 5)]
    pub max_degree: usize,

    /// Nelder–Mead iteration cap per run.
    #[arg(long, default_value_t = 5_000)]
    pub max_iters: u64,
}

/// Options for plotting a saved fit.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Result JSON file produced by `lsq fit --export-json`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `lsq explore`.
#[derive(Debug, Args, Clone)]
pub struct ExploreArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Starting loss.
    #[arg(short = 'l', long, value_enum, default_value_t = LossKind::Squared)]
    pub loss: LossKind,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}
