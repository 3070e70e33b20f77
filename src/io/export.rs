//! Export the dashboard series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::TimePoint;
use crate::error::AppError;

/// Write `date,<value_column>` rows, one per point, in series order.
pub fn write_series_csv<T: TimePoint>(
    path: &Path,
    value_column: &str,
    points: &[T],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "date,{value_column}")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writeln!(out, "{},{:.4}", p.period(), p.level())
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    tracing::info!(path = %path.display(), rows = points.len(), "wrote CSV export");
    Ok(())
}
