//! Fetch → snapshot → parse, for one run.

use std::path::{Path, PathBuf};

use rathunter_core::StockRecord;

use crate::client::FindARatClient;
use crate::error::FetchError;
use crate::snapshot::{parse_records, write_snapshot};

/// Pulls the listing feed once per run and keeps the raw snapshot current.
pub struct Ingestor {
    client: FindARatClient,
    snapshot_path: PathBuf,
}

impl Ingestor {
    #[must_use]
    pub fn new(client: FindARatClient, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            snapshot_path: snapshot_path.into(),
        }
    }

    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Fetches the feed, overwrites the snapshot, and parses the records.
    ///
    /// The snapshot is always rewritten: with the fetched array on success,
    /// or with `[]` when the fetch fails so a stale file never outlives a
    /// failed run.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] from the transport, the snapshot write, or
    /// record parsing. A fetch failure is logged before it is returned.
    pub async fn ingest(&self) -> Result<Vec<StockRecord>, FetchError> {
        let source_url = self.client.source_url();
        match self.client.fetch_raw().await {
            Ok(raw) => {
                tracing::info!(source_url, records = raw.len(), "listings fetched");
                write_snapshot(&self.snapshot_path, &raw)?;
                parse_records(raw)
            }
            Err(err) => {
                tracing::error!(source_url, error = %err, "failed to fetch listings");
                if let Err(snapshot_err) = write_snapshot(&self.snapshot_path, &[]) {
                    tracing::error!(error = %snapshot_err, "failed to reset snapshot");
                }
                Err(err)
            }
        }
    }

    /// Parses caller-supplied records without touching the network or the
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Deserialize`] if a record has the wrong shape.
    pub fn offline(raw: Vec<serde_json::Value>) -> Result<Vec<StockRecord>, FetchError> {
        tracing::warn!(records = raw.len(), "using offline data");
        parse_records(raw)
    }
}
