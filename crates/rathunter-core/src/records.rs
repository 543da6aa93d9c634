//! Listing records as fetched and after augmentation.
//!
//! ## Observed shape from the findarat feed
//!
//! Each element of the top-level JSON array is an object with camelCase
//! keys: `name`, `address`, `status`, `priceInCents`, `lat`, `lng`, `date`,
//! `updatedAt`, `createdAt`, plus assorted passthrough keys (`id`,
//! `verified`, `logoPath`, `link`, `groupID`, ...). Timestamps are UTC
//! strings like `"2022-01-13T02:09:35.458Z"`.
//!
//! Every known field is optional here: a record with a missing price or
//! coordinate still parses, and the gap surfaces during augmentation where
//! the configured [`crate::MalformedRowPolicy`] decides what happens.
//! [`StockRecord::from_json`] treats a known field of the wrong JSON type
//! the same way: the value is set aside in [`StockRecord::rejected`] instead
//! of failing the whole feed.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::StockStatus;

/// A single raw listing from the source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub price_in_cents: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Every other key, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// Known keys whose value had the wrong JSON type, keyed by source name.
    #[serde(skip)]
    pub rejected: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Copy)]
enum JsonKind {
    Text,
    Integer,
    Number,
}

const TYPED_FIELDS: [(&str, JsonKind); 9] = [
    ("name", JsonKind::Text),
    ("address", JsonKind::Text),
    ("status", JsonKind::Text),
    ("priceInCents", JsonKind::Integer),
    ("lat", JsonKind::Number),
    ("lng", JsonKind::Number),
    ("date", JsonKind::Text),
    ("updatedAt", JsonKind::Text),
    ("createdAt", JsonKind::Text),
];

impl JsonKind {
    fn accepts(self, value: &serde_json::Value) -> bool {
        match self {
            _ if value.is_null() => true,
            JsonKind::Text => value.is_string(),
            JsonKind::Integer => value.as_i64().is_some(),
            JsonKind::Number => value.is_number(),
        }
    }
}

impl StockRecord {
    /// Parses one feed element, setting aside known fields of the wrong type.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `value` is not a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut fields = match value {
            serde_json::Value::Object(fields) => fields,
            other => return serde_json::from_value(other),
        };

        let mut rejected = BTreeMap::new();
        for (key, kind) in TYPED_FIELDS {
            match fields.remove(key) {
                Some(value) if !kind.accepts(&value) => {
                    rejected.insert(key.to_string(), value);
                }
                Some(value) => {
                    fields.insert(key.to_string(), value);
                }
                None => {}
            }
        }

        let mut record: StockRecord = serde_json::from_value(serde_json::Value::Object(fields))?;
        record.rejected = rejected;
        Ok(record)
    }

    /// Classified status; a missing status is treated as an empty unknown code.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_code(self.status.as_deref().unwrap_or_default())
    }

    /// The `verified` passthrough flag, if the source sent one.
    #[must_use]
    pub fn verified(&self) -> Option<&serde_json::Value> {
        self.extra.get("verified")
    }
}

/// A [`StockRecord`] plus the columns derived from it for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedRecord {
    pub record: StockRecord,
    pub google_maps_url: String,
    pub price_in_dollars: Decimal,
    pub date_local_time: DateTime<FixedOffset>,
    pub updated_at_local_time: DateTime<FixedOffset>,
    pub created_at_local_time: DateTime<FixedOffset>,
    pub last_updated_mins_ago: i64,
}
