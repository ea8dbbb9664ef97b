//! Read/write fit-result JSON files.
//!
//! A result file is the portable representation of one fit:
//! - model family + fitted parameters
//! - loss label, final loss value, and how the minimizer stopped
//! - optionally the observations the fit was made on (for re-plotting)

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, FitResult};
use crate::error::{AppError, FitError};

/// On-disk schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    #[serde(flatten)]
    pub fit: FitResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Dataset>,
}

/// Write a fit result (and optionally its data) as pretty JSON.
pub fn write_result_json(path: &Path, fit: &FitResult, data: Option<&Dataset>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    let out = ResultFile {
        tool: "lsq".to_string(),
        fit: fit.clone(),
        data: data.cloned(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;
    Ok(())
}

/// Read a fit-result JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let result: ResultFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    // Deserialization bypasses `Dataset::new`; re-validate.
    if let Some(data) = &result.data {
        Dataset::new(data.points().to_vec())?;
    }
    let expected = result.fit.model.param_count();
    if result.fit.params.len() != expected {
        return Err(FitError::ParamCountMismatch {
            model: result.fit.model.display_name(),
            expected,
            actual: result.fit.params.len(),
        }
        .into());
    }
    Ok(result)
}
