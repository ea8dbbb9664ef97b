//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - minimize a loss over model parameters (Nelder–Mead via `argmin`)
//! - fit every built-in loss side by side
//! - tabulate the affine loss over a parameter grid (parallel)
//! - scan polynomial degrees and select one using BIC + guardrails

pub mod compare;
pub mod fitter;
pub mod problem;
pub mod selection;
pub mod simplex;
pub mod surface;

pub use compare::*;
pub use fitter::*;
pub use selection::*;
pub use surface::*;
