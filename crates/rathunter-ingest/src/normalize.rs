//! Augmentation from raw [`StockRecord`]s to [`AugmentedRecord`]s.
//!
//! Each derived column is a pure per-row function; the only outside input is
//! the [`RunContext`] supplying "now" and the local offset.

use chrono::{DateTime, NaiveDateTime, Utc};
use rathunter_core::{AugmentedRecord, MalformedRowPolicy, RunContext, StockRecord};
use rust_decimal::Decimal;

use crate::error::NormalizeError;

/// Source timestamp layout: UTC, exactly three fractional digits, literal `Z`.
const SOURCE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3fZ";

/// A row dropped under [`MalformedRowPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: NormalizeError,
}

/// Result of an augmentation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AugmentReport {
    pub records: Vec<AugmentedRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Augments every record with map link, dollar price, local times, and
/// minutes since last update.
///
/// Output order matches input order.
///
/// # Errors
///
/// Under [`MalformedRowPolicy::Abort`], returns the first row's
/// [`NormalizeError`]. Under [`MalformedRowPolicy::Skip`] this never fails;
/// bad rows are reported in [`AugmentReport::skipped`].
pub fn augment(
    records: &[StockRecord],
    ctx: &RunContext,
    policy: MalformedRowPolicy,
) -> Result<AugmentReport, NormalizeError> {
    let mut report = AugmentReport::default();

    for (row, record) in records.iter().enumerate() {
        match augment_record(row, record, ctx) {
            Ok(augmented) => report.records.push(augmented),
            Err(err) => match policy {
                MalformedRowPolicy::Abort => return Err(err),
                MalformedRowPolicy::Skip => {
                    tracing::warn!(row, error = %err, "skipping malformed record");
                    report.skipped.push(SkippedRow { row, reason: err });
                }
            },
        }
    }

    tracing::debug!(
        augmented = report.records.len(),
        skipped = report.skipped.len(),
        "augmentation complete"
    );
    Ok(report)
}

/// Augments a single record; `row` is only used to label errors.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a known field had the wrong JSON type, a
/// required field is missing, or a timestamp does not match the source layout.
pub fn augment_record(
    row: usize,
    record: &StockRecord,
    ctx: &RunContext,
) -> Result<AugmentedRecord, NormalizeError> {
    if let Some((field, value)) = record.rejected.iter().next() {
        return Err(NormalizeError::InvalidField {
            row,
            field: field.clone(),
            value: value.to_string(),
        });
    }

    let lat = require(row, "lat", record.lat)?;
    let lng = require(row, "lng", record.lng)?;
    let price_in_cents = require(row, "priceInCents", record.price_in_cents)?;

    let date = parse_source_timestamp(row, "date", record.date.as_deref())?;
    let updated_at = parse_source_timestamp(row, "updatedAt", record.updated_at.as_deref())?;
    let created_at = parse_source_timestamp(row, "createdAt", record.created_at.as_deref())?;

    let updated_at_local_time = ctx.to_local(updated_at);
    let last_updated_mins_ago = ctx.minutes_since(updated_at_local_time);
    tracing::trace!(row, last_updated_mins_ago, "diff in mins");

    Ok(AugmentedRecord {
        record: record.clone(),
        google_maps_url: google_maps_url(lat, lng),
        price_in_dollars: price_in_dollars(price_in_cents),
        date_local_time: ctx.to_local(date),
        updated_at_local_time,
        created_at_local_time: ctx.to_local(created_at),
        last_updated_mins_ago,
    })
}

#[must_use]
pub fn google_maps_url(lat: f64, lng: f64) -> String {
    format!("https://maps.google.com/maps?q={lat},{lng}")
}

/// Exact conversion: 1999 cents is `19.99`, never `19.989999...`.
#[must_use]
pub fn price_in_dollars(price_in_cents: i64) -> Decimal {
    Decimal::new(price_in_cents, 2)
}

/// Parses a source timestamp such as `2022-01-13T02:09:35.458Z` as UTC.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingField`] if `value` is `None`, or
/// [`NormalizeError::InvalidTimestamp`] for any other layout.
pub fn parse_source_timestamp(
    row: usize,
    field: &'static str,
    value: Option<&str>,
) -> Result<DateTime<Utc>, NormalizeError> {
    let value = require(row, field, value)?;
    NaiveDateTime::parse_from_str(value, SOURCE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| NormalizeError::InvalidTimestamp {
            row,
            field,
            value: value.to_string(),
        })
}

fn require<T>(row: usize, field: &'static str, value: Option<T>) -> Result<T, NormalizeError> {
    value.ok_or(NormalizeError::MissingField { row, field })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
