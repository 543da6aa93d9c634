//! Shared fetch-and-augment steps used by every command.

use std::path::Path;

use rathunter_core::{AppConfig, AugmentedRecord, OutputPaths, RunContext, StockRecord};
use rathunter_ingest::{augment, load_offline_records, FindARatClient, Ingestor};

/// Fetches listings from the source, or reads them from `offline` when given.
///
/// Online fetches always rewrite the snapshot; a failed fetch leaves it as
/// an empty array and is returned as an error.
pub(crate) async fn fetch_records(
    config: &AppConfig,
    paths: &OutputPaths,
    offline: Option<&Path>,
) -> anyhow::Result<Vec<StockRecord>> {
    if let Some(path) = offline {
        let raw = load_offline_records(path)?;
        return Ok(Ingestor::offline(raw)?);
    }

    let client = FindARatClient::new(
        &config.source_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.ssl_verify,
    )?;
    let ingestor = Ingestor::new(client, paths.snapshot_path());
    let records = ingestor
        .ingest()
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch listings from {}: {e}", config.source_url))?;
    Ok(records)
}

/// Fetch then augment, applying the configured malformed-row policy.
pub(crate) async fn load_table(
    config: &AppConfig,
    paths: &OutputPaths,
    ctx: &RunContext,
    offline: Option<&Path>,
) -> anyhow::Result<Vec<AugmentedRecord>> {
    let records = fetch_records(config, paths, offline).await?;
    let report = augment(&records, ctx, config.malformed_rows)?;
    if !report.skipped.is_empty() {
        tracing::warn!(
            skipped = report.skipped.len(),
            policy = %config.malformed_rows,
            "malformed records were dropped"
        );
    }
    tracing::info!(records = report.records.len(), "listings ready");
    Ok(report.records)
}

/// One line per row for terminal output.
pub(crate) fn summary_line(row: &AugmentedRecord) -> String {
    let record = &row.record;
    format!(
        "{:>5} min  {:<9}  ${:<7}  {}  |  {}",
        row.last_updated_mins_ago,
        record.status.as_deref().unwrap_or("-"),
        row.price_in_dollars.to_string(),
        record.name.as_deref().unwrap_or("-"),
        record.address.as_deref().unwrap_or("-"),
    )
}
