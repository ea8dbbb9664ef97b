//! Input/output helpers.
//!
//! - CSV dataset ingest (`ingest`)
//! - per-point residual export (`export`)
//! - fit-result JSON read/write (`result`)

pub mod export;
pub mod ingest;
pub mod result;

pub use export::*;
pub use ingest::*;
pub use result::*;
