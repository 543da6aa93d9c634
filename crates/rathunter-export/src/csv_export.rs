//! CSV export of an augmented table.

use std::path::{Path, PathBuf};

use rathunter_core::AugmentedRecord;

use crate::columns::{cell_value, table_columns};
use crate::error::ExportError;

/// Writes `table` to `path` with a header row and no index column,
/// replacing any existing file.
///
/// An empty table still gets a header row (the raw and derived columns).
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if the file cannot be created or written.
pub fn export_csv(table: &[AugmentedRecord], path: &Path) -> Result<PathBuf, ExportError> {
    let columns = table_columns(table);
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(&columns)?;
    for row in table {
        writer.write_record(columns.iter().map(|column| cell_value(row, column)))?;
    }
    writer.flush().map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let written = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    tracing::info!(path = %written.display(), rows = table.len(), "CSV file saved");
    Ok(written)
}
