//! `lsq-lab` library crate.
//!
//! Fits affine and polynomial models to `(x, y)` data by numerically
//! minimizing a residual loss (plain sum, absolute, or squared).
//!
//! The binary (`lsq`) is a thin wrapper around this library so that core
//! logic is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod loss;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
