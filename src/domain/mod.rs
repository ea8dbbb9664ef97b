//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations (`Point`, `Dataset`)
//! - model and loss selectors (`ModelFamily`, `ModelSpec`, `LossKind`)
//! - fit inputs and outputs (`FitOptions`, `FitConfig`, `FitResult`, `FitStatus`)

pub mod types;

pub use types::*;
