//! Tabular view of an augmented table: column names and cell text.
//!
//! Column order is the raw source columns, then passthrough keys (sorted,
//! unioned across rows), then the derived columns.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use rathunter_core::AugmentedRecord;

pub const RAW_COLUMNS: [&str; 9] = [
    "name",
    "address",
    "status",
    "priceInCents",
    "lat",
    "lng",
    "date",
    "updatedAt",
    "createdAt",
];

pub const DERIVED_COLUMNS: [&str; 6] = [
    "google_maps_url",
    "price_in_dollars",
    "date_local_time",
    "updatedAt_local_time",
    "createdAt_local_time",
    "last_updated_mins_ago",
];

/// Every column present in `table`, in export order.
#[must_use]
pub fn table_columns(table: &[AugmentedRecord]) -> Vec<String> {
    let passthrough: BTreeSet<&str> = table
        .iter()
        .flat_map(|row| row.record.extra.keys().map(String::as_str))
        .filter(|key| !RAW_COLUMNS.contains(key) && !DERIVED_COLUMNS.contains(key))
        .collect();

    RAW_COLUMNS
        .iter()
        .copied()
        .chain(passthrough)
        .chain(DERIVED_COLUMNS.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Text for one cell. Absent values render as an empty string.
#[must_use]
pub fn cell_value(row: &AugmentedRecord, column: &str) -> String {
    let record = &row.record;
    match column {
        "name" => record.name.clone().unwrap_or_default(),
        "address" => record.address.clone().unwrap_or_default(),
        "status" => record.status.clone().unwrap_or_default(),
        "priceInCents" => display_or_empty(record.price_in_cents),
        "lat" => display_or_empty(record.lat),
        "lng" => display_or_empty(record.lng),
        "date" => record.date.clone().unwrap_or_default(),
        "updatedAt" => record.updated_at.clone().unwrap_or_default(),
        "createdAt" => record.created_at.clone().unwrap_or_default(),
        "google_maps_url" => row.google_maps_url.clone(),
        "price_in_dollars" => row.price_in_dollars.to_string(),
        "date_local_time" => format_local(row.date_local_time),
        "updatedAt_local_time" => format_local(row.updated_at_local_time),
        "createdAt_local_time" => format_local(row.created_at_local_time),
        "last_updated_mins_ago" => row.last_updated_mins_ago.to_string(),
        other => record
            .extra
            .get(other)
            .map(passthrough_text)
            .unwrap_or_default(),
    }
}

/// Local timestamps render as RFC 3339 with milliseconds, e.g.
/// `2022-01-13T13:09:35.458+11:00`.
#[must_use]
pub fn format_local(ts: DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, false)
}

fn display_or_empty<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// Strings are written bare; everything else as compact JSON.
fn passthrough_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::row;
    use super::*;

    #[test]
    fn columns_for_empty_table_are_raw_then_derived() {
        let columns = table_columns(&[]);
        assert_eq!(columns.len(), RAW_COLUMNS.len() + DERIVED_COLUMNS.len());
        assert_eq!(columns[0], "name");
        assert_eq!(columns[columns.len() - 1], "last_updated_mins_ago");
    }

    #[test]
    fn passthrough_columns_are_sorted_union() {
        let mut a = row("A", 1);
        a.record.extra.insert("logoPath".to_string(), serde_json::json!("/a.png"));
        let mut b = row("B", 2);
        b.record.extra.insert("id".to_string(), serde_json::json!(7));

        let columns = table_columns(&[a, b]);
        let passthrough: Vec<&str> = columns[RAW_COLUMNS.len()..columns.len() - DERIVED_COLUMNS.len()]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(passthrough, vec!["id", "logoPath", "verified"]);
    }

    #[test]
    fn cell_values_render_each_kind() {
        let mut r = row("CBD Pharmacy", 61);
        r.record.extra.insert("groupID".to_string(), serde_json::Value::Null);
        r.record.lng = None;

        assert_eq!(cell_value(&r, "name"), "CBD Pharmacy");
        assert_eq!(cell_value(&r, "priceInCents"), "1999");
        assert_eq!(cell_value(&r, "lat"), "-37.8");
        assert_eq!(cell_value(&r, "lng"), "");
        assert_eq!(cell_value(&r, "price_in_dollars"), "19.99");
        assert_eq!(cell_value(&r, "verified"), "true");
        assert_eq!(cell_value(&r, "groupID"), "");
        assert_eq!(cell_value(&r, "not_a_column"), "");
        assert_eq!(cell_value(&r, "last_updated_mins_ago"), "61");
        assert_eq!(
            cell_value(&r, "updatedAt_local_time"),
            "2022-01-13T13:09:35.458+11:00"
        );
    }
}
