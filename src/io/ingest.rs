//! CSV dataset ingest.
//!
//! Expected schema: a header row with `x` and `y` columns (any order, case
//! insensitive, extra columns ignored). Every data row must parse; the first
//! bad row aborts the load with its line number.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::info;

use crate::domain::{Dataset, Point};
use crate::error::AppError;

/// Load an `x,y` CSV file into a [`Dataset`].
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_dataset(file)?;
    info!("loaded {} points from {}", data.len(), path.display());
    Ok(data)
}

/// Parse an `x,y` CSV stream into a [`Dataset`].
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_col = *header_map
        .get("x")
        .ok_or_else(|| AppError::new(2, "Missing required column: `x`"))?;
    let y_col = *header_map
        .get("y")
        .ok_or_else(|| AppError::new(2, "Missing required column: `y`"))?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(3, format!("CSV parse error on line {line}: {e}")))?;
        let x = parse_field(&record, x_col, "x", line)?;
        let y = parse_field(&record, y_col, "y", line)?;
        points.push(Point { x, y });
    }

    if points.is_empty() {
        return Err(AppError::new(3, "CSV contains no data rows."));
    }
    Ok(Dataset::new(points)?)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_field(record: &StringRecord, col: usize, name: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(col)
        .ok_or_else(|| AppError::new(3, format!("Line {line}: missing `{name}` value.")))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| AppError::new(3, format!("Line {line}: invalid `{name}` value '{raw}'.")))?;
    if !value.is_finite() {
        return Err(AppError::new(3, format!("Line {line}: non-finite `{name}` value '{raw}'.")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_columns_in_any_order() {
        let csv = "\u{feff}Label, Y ,X\na,3,0\nb,8,1\n";
        let data = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(data.points(), &[Point { x: 0.0, y: 3.0 }, Point { x: 1.0, y: 8.0 }]);
    }

    #[test]
    fn reports_bad_rows_with_line_numbers() {
        let err = read_dataset("x,y\n0,1\n1,oops\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Line 3"), "{err}");
    }

    #[test]
    fn missing_column_and_empty_file() {
        let err = read_dataset("x,z\n0,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`y`"));
        let err = read_dataset("x,y\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }
}
