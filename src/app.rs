//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads (and optionally perturbs) the dataset
//! - runs fits, comparisons, surfaces and degree scans
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{
    Command, CompareArgs, DataArgs, DegreesArgs, ExploreArgs, FitArgs, ModelArgs, PlotArgs, SolverArgs, SurfaceArgs,
};
use crate::domain::{FitConfig, FitOptions};
use crate::error::AppError;
use crate::fit::GridAxis;

pub mod pipeline;
pub mod session;

/// Entry point for the `lsq` binary.
pub fn run() -> Result<(), AppError> {
    // `lsq` and `lsq --loss absolute` behave like `lsq fit ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Compare(args) => handle_compare(args),
        Command::Surface(args) => handle_surface(args),
        Command::Degrees(args) => handle_degrees(args),
        Command::Plot(args) => handle_plot(args),
        Command::Explore(args) => handle_explore(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!("{}", crate::report::format_run_summary(&run.data, &run.fit, &config));
    println!("{}", crate::report::format_rankings(&run.rankings));

    if config.plot {
        let plot = crate::plot::render_ascii_plot(
            &run.data,
            &run.fit,
            config.plot_width,
            config.plot_height,
            Some(&run.rankings),
        );
        println!("{plot}");
    }

    if let Some(path) = &config.export_csv {
        crate::io::export::write_residuals_csv(path, &run.residuals)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::result::write_result_json(path, &run.fit, Some(&run.data))?;
    }

    Ok(())
}

fn handle_compare(args: CompareArgs) -> Result<(), AppError> {
    let mut config = data_config(&args.data);
    apply_model(&mut config, &args.model);
    apply_solver(&mut config, &args.solver);

    let data = pipeline::load_data(&config)?;
    crate::fit::validate_model(&data, config.model)?;
    let cmp = crate::fit::compare_losses(&data, config.model, &config.initial_guess(), &config.options);

    println!("{}", crate::report::format_comparison(&cmp));
    Ok(())
}

fn handle_surface(args: SurfaceArgs) -> Result<(), AppError> {
    let config = data_config(&args.data);
    let data = pipeline::load_data(&config)?;

    let surface = crate::fit::loss_surface(
        &data,
        &args.loss,
        GridAxis::new(args.slope_min, args.slope_max, args.steps),
        GridAxis::new(args.intercept_min, args.intercept_max, args.steps),
    )?;

    println!("{}", crate::report::format_surface_summary(&surface));
    if let Some(path) = &args.export_csv {
        crate::io::export::write_surface_csv(path, &surface)?;
    }
    Ok(())
}

fn handle_degrees(args: DegreesArgs) -> Result<(), AppError> {
    let config = data_config(&args.data);
    let data = pipeline::load_data(&config)?;

    let opts = FitOptions {
        max_iters: args.max_iters,
        ..FitOptions::default()
    };
    let scan = crate::fit::scan_degrees(&data, args.max_degree, &opts)?;

    println!("{}", crate::report::format_degree_scan(&scan));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let result = crate::io::result::read_result_json(&args.result)?;
    let plot = crate::plot::render_ascii_plot_from_result(&result, args.width, args.height);

    println!("{plot}");
    Ok(())
}

fn handle_explore(args: ExploreArgs) -> Result<(), AppError> {
    let mut config = data_config(&args.data);
    apply_model(&mut config, &args.model);
    config.loss = args.loss;

    let base = pipeline::load_base_dataset(config.csv_path.as_deref())?;
    let mut session = session::Session::new(base, config)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    crate::cli::prompt::run_prompt(&mut session, stdin.lock(), stdout.lock(), args.width, args.height)
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    let mut config = data_config(&args.data);
    apply_model(&mut config, &args.model);
    apply_solver(&mut config, &args.solver);

    FitConfig {
        loss: args.loss,
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_json: args.export_json.clone(),
        export_csv: args.export_csv.clone(),
        ..config
    }
}

fn data_config(args: &DataArgs) -> FitConfig {
    FitConfig {
        csv_path: args.csv.clone(),
        noise_sigma: args.noise,
        seed: args.seed,
        ..FitConfig::default()
    }
}

fn apply_model(config: &mut FitConfig, args: &ModelArgs) {
    config.model = args.model.to_family(args.degree);
}

fn apply_solver(config: &mut FitConfig, args: &SolverArgs) {
    config.initial_params = args.init.clone();
    config.options.max_iters = args.max_iters;
    config.options.restarts = args.restarts;
}

/// Rewrite argv so `lsq` defaults to `lsq fit`.
///
/// Rules:
/// - `lsq`                      -> `lsq fit`
/// - `lsq --loss absolute ...`  -> `lsq fit --loss absolute ...`
/// - `lsq --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("fit".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "fit" | "compare" | "surface" | "degrees" | "plot" | "explore"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "fit flags".
    if arg1.starts_with('-') {
        argv.insert(1, "fit".to_string());
        return argv;
    }

    argv
}
