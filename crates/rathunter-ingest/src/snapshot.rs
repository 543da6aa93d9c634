//! Raw snapshot persistence and offline record loading.

use std::path::Path;

use rathunter_core::StockRecord;

use crate::error::FetchError;

/// Writes `records` to `path` as indented JSON, replacing any prior file.
///
/// Object keys come out sorted, so the same payload always produces the
/// same bytes.
///
/// # Errors
///
/// Returns [`FetchError::SnapshotIo`] if the file cannot be written.
pub fn write_snapshot(path: &Path, records: &[serde_json::Value]) -> Result<(), FetchError> {
    let mut body = serde_json::to_string_pretty(records).map_err(FetchError::SnapshotSerialize)?;
    body.push('\n');

    std::fs::write(path, body).map_err(|e| FetchError::SnapshotIo {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        records = records.len(),
        "snapshot saved"
    );
    Ok(())
}

/// Reads a raw record list from a JSON file, e.g. a previous snapshot.
///
/// # Errors
///
/// Returns [`FetchError::SnapshotIo`] if the file cannot be read, or
/// [`FetchError::Deserialize`] if it is not a JSON array.
pub fn load_offline_records(path: &Path) -> Result<Vec<serde_json::Value>, FetchError> {
    let content = std::fs::read_to_string(path).map_err(|e| FetchError::SnapshotIo {
        path: path.display().to_string(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| FetchError::Deserialize {
        context: format!("offline records from {}", path.display()),
        source: e,
    })
}

/// Converts raw JSON objects into typed [`StockRecord`]s.
///
/// A known field of the wrong JSON type does not fail the batch; it lands in
/// [`StockRecord::rejected`] and the malformed-row policy handles it later.
///
/// # Errors
///
/// Returns [`FetchError::Deserialize`] naming the first element that is not
/// an object.
pub fn parse_records(raw: Vec<serde_json::Value>) -> Result<Vec<StockRecord>, FetchError> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, value)| {
            StockRecord::from_json(value).map_err(|e| FetchError::Deserialize {
                context: format!("record {idx}"),
                source: e,
            })
        })
        .collect()
}
