//! Datasets: the built-in tutorial line and Gaussian noise injection.

pub mod sample;

pub use sample::*;
