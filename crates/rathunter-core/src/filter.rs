//! Row selection over an augmented table.
//!
//! All filters are stable: matching rows keep their original relative order.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::records::AugmentedRecord;

/// Default freshness window for [`filter_aged`], in minutes.
pub const DEFAULT_MAX_AGE_MINUTES: i64 = 180;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid address pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Keeps rows whose address matches `address_pattern` and whose status is
/// in the requested stock class.
///
/// The pattern is a case-insensitive regex searched anywhere in the address,
/// so plain substrings (`"Geelong"`) and alternations (`"3000|3001"`,
/// `"VIC\s3\d\d\d"`) both work. `in_stock = true` keeps `IN_STOCK` and
/// `LOW_STOCK`; `false` keeps only `NO_STOCK`. Rows with an unrecognized
/// status or no address never match.
///
/// # Errors
///
/// Returns [`FilterError::InvalidPattern`] if the pattern does not compile.
pub fn filter_by_address(
    table: &[AugmentedRecord],
    address_pattern: &str,
    in_stock: bool,
) -> Result<Vec<AugmentedRecord>, FilterError> {
    let matcher = compile_pattern(address_pattern)?;
    tracing::debug!(pattern = address_pattern, in_stock, "performing address search");

    let matched: Vec<AugmentedRecord> = table
        .iter()
        .filter(|row| {
            let status = row.record.stock_status();
            let status_ok = if in_stock {
                status.is_available()
            } else {
                status.is_sold_out()
            };
            status_ok
                && row
                    .record
                    .address
                    .as_deref()
                    .is_some_and(|address| matcher.is_match(address))
        })
        .cloned()
        .collect();

    Ok(matched)
}

/// Keeps rows updated no more than `max_minutes` ago.
#[must_use]
pub fn filter_aged(table: &[AugmentedRecord], max_minutes: i64) -> Vec<AugmentedRecord> {
    let retained: Vec<AugmentedRecord> = table
        .iter()
        .filter(|row| row.last_updated_mins_ago <= max_minutes)
        .cloned()
        .collect();

    let removed = table.len() - retained.len();
    tracing::info!(
        removed,
        retained = retained.len(),
        max_minutes,
        "{removed} entries removed, {} have been retained",
        retained.len()
    );
    retained
}

/// Joins postcodes into an alternation pattern, e.g. `3000|3001`.
///
/// Each postcode is regex-escaped so stray punctuation cannot widen the match.
/// Blank entries are dropped; an empty alternative would match every address.
#[must_use]
pub fn postcode_pattern<S: AsRef<str>>(postcodes: &[S]) -> String {
    postcodes
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

fn compile_pattern(pattern: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
