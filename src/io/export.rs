//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use crate::domain::PointResidual;
use crate::error::AppError;
use crate::fit::LossSurface;

/// Write per-point results (`x,y,y_fit,residual`) to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["x", "y", "y_fit", "residual"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    for r in residuals {
        writer
            .write_record([
                format!("{:.10}", r.point.x),
                format!("{:.10}", r.point.y),
                format!("{:.10}", r.y_fit),
                format!("{:.10}", r.residual),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write a loss surface in long form (`slope,intercept,loss`), row-major.
pub fn write_surface_csv(path: &Path, surface: &LossSurface) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create surface CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["slope", "intercept", "loss"])
        .map_err(|e| AppError::new(2, format!("Failed to write surface CSV header: {e}")))?;
    for cell in surface.cells() {
        writer
            .write_record([
                format!("{:.10}", cell.slope),
                format!("{:.10}", cell.intercept),
                format!("{:.10}", cell.loss),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write surface CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush surface CSV: {e}")))?;
    Ok(())
}
