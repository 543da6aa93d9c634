use chrono::{FixedOffset, TimeZone, Timelike};

use super::*;

fn melbourne() -> FixedOffset {
    FixedOffset::east_opt(11 * 3600).unwrap()
}

/// 61 minutes after the scenario record's `updatedAt`.
fn run_ctx() -> RunContext {
    let now = Utc.with_ymd_and_hms(2022, 1, 13, 3, 10, 35).unwrap()
        + chrono::Duration::milliseconds(458);
    RunContext::at(now, melbourne(), None)
}

fn scenario_record() -> StockRecord {
    serde_json::from_value(serde_json::json!({
        "name": "CBD Pharmacy",
        "address": "3000 VIC",
        "status": "IN_STOCK",
        "priceInCents": 1999,
        "lat": -37.8,
        "lng": 144.9,
        "date": "2022-01-13T02:09:35.458Z",
        "updatedAt": "2022-01-13T02:09:35.458Z",
        "createdAt": "2022-01-13T02:00:00.000Z"
    }))
    .unwrap()
}

// -----------------------------------------------------------------------
// augment_record
// -----------------------------------------------------------------------

#[test]
fn scenario_record_gets_derived_columns() {
    let augmented = augment_record(0, &scenario_record(), &run_ctx()).unwrap();
    assert_eq!(augmented.price_in_dollars.to_string(), "19.99");
    assert_eq!(augmented.last_updated_mins_ago, 61);
    assert!(augmented.google_maps_url.contains("q=-37.8,144.9"));
    assert_eq!(
        augmented.google_maps_url,
        "https://maps.google.com/maps?q=-37.8,144.9"
    );
}

#[test]
fn local_times_use_run_offset() {
    let augmented = augment_record(0, &scenario_record(), &run_ctx()).unwrap();
    assert_eq!(augmented.updated_at_local_time.offset(), &melbourne());
    assert_eq!(augmented.updated_at_local_time.hour(), 13);
    assert_eq!(
        augmented.created_at_local_time.to_rfc3339(),
        "2022-01-13T13:00:00+11:00"
    );
    assert_eq!(augmented.date_local_time, augmented.updated_at_local_time);
}

#[test]
fn raw_record_is_carried_unchanged() {
    let record = scenario_record();
    let augmented = augment_record(0, &record, &run_ctx()).unwrap();
    assert_eq!(augmented.record, record);
}

#[test]
fn missing_price_is_reported_with_row() {
    let mut record = scenario_record();
    record.price_in_cents = None;
    let err = augment_record(4, &record, &run_ctx()).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::MissingField {
            row: 4,
            field: "priceInCents"
        }
    );
}

#[test]
fn missing_coordinate_is_reported() {
    let mut record = scenario_record();
    record.lng = None;
    let err = augment_record(0, &record, &run_ctx()).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingField { field: "lng", .. }));
}

// -----------------------------------------------------------------------
// parse_source_timestamp
// -----------------------------------------------------------------------

#[test]
fn parses_millisecond_utc_timestamp() {
    let ts = parse_source_timestamp(0, "date", Some("2022-01-13T02:09:35.458Z")).unwrap();
    assert_eq!(ts.to_rfc3339(), "2022-01-13T02:09:35.458+00:00");
}

#[test]
fn rejects_timestamp_without_fraction() {
    let err = parse_source_timestamp(0, "date", Some("2022-01-13T02:09:35Z")).unwrap_err();
    assert!(matches!(err, NormalizeError::InvalidTimestamp { field: "date", .. }));
}

#[test]
fn rejects_timestamp_with_offset_suffix() {
    let result = parse_source_timestamp(0, "updatedAt", Some("2022-01-13T02:09:35.458+00:00"));
    assert!(result.is_err());
}

#[test]
fn rejects_microsecond_precision() {
    let result = parse_source_timestamp(0, "createdAt", Some("2022-01-13T02:09:35.458123Z"));
    assert!(result.is_err());
}

#[test]
fn missing_timestamp_is_missing_field() {
    let err = parse_source_timestamp(2, "createdAt", None).unwrap_err();
    assert_eq!(
        err,
        NormalizeError::MissingField {
            row: 2,
            field: "createdAt"
        }
    );
}

// -----------------------------------------------------------------------
// augment
// -----------------------------------------------------------------------

#[test]
fn empty_input_gives_empty_report() {
    let report = augment(&[], &run_ctx(), MalformedRowPolicy::Abort).unwrap();
    assert!(report.records.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn augment_is_deterministic_for_a_fixed_clock() {
    let records = vec![scenario_record(), scenario_record()];
    let first = augment(&records, &run_ctx(), MalformedRowPolicy::Abort).unwrap();
    let second = augment(&records, &run_ctx(), MalformedRowPolicy::Abort).unwrap();
    assert_eq!(first, second);
}

#[test]
fn abort_policy_fails_whole_batch() {
    let records = vec![scenario_record(), StockRecord::default(), scenario_record()];
    let err = augment(&records, &run_ctx(), MalformedRowPolicy::Abort).unwrap_err();
    assert_eq!(err.row(), 1);
}

#[test]
fn skip_policy_drops_bad_rows_and_keeps_order() {
    let mut late = scenario_record();
    late.name = Some("Late".to_string());
    late.updated_at = Some("2022-01-13T03:00:35.458Z".to_string());

    let mut bad = scenario_record();
    bad.date = Some("13/01/2022".to_string());

    let records = vec![scenario_record(), bad, late];
    let report = augment(&records, &run_ctx(), MalformedRowPolicy::Skip).unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[1].record.name.as_deref(), Some("Late"));
    assert_eq!(report.records[1].last_updated_mins_ago, 10);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 1);
    assert!(matches!(
        report.skipped[0].reason,
        NormalizeError::InvalidTimestamp { field: "date", .. }
    ));
}

fn feed_with_text_price() -> Vec<StockRecord> {
    let mut bad = serde_json::to_value(scenario_record()).unwrap();
    bad["priceInCents"] = serde_json::json!("1999");
    let good = serde_json::to_value(scenario_record()).unwrap();
    crate::snapshot::parse_records(vec![good, bad]).unwrap()
}

#[test]
fn skip_policy_drops_row_with_mistyped_price() {
    let report = augment(&feed_with_text_price(), &run_ctx(), MalformedRowPolicy::Skip).unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].reason,
        NormalizeError::InvalidField {
            row: 1,
            field: "priceInCents".to_string(),
            value: "\"1999\"".to_string(),
        }
    );
}

#[test]
fn abort_policy_fails_on_mistyped_price() {
    let err = augment(&feed_with_text_price(), &run_ctx(), MalformedRowPolicy::Abort).unwrap_err();
    assert_eq!(err.row(), 1);
    assert!(matches!(err, NormalizeError::InvalidField { .. }));
}

#[test]
fn price_conversion_is_exact() {
    assert_eq!(price_in_dollars(1999).to_string(), "19.99");
    assert_eq!(price_in_dollars(500).to_string(), "5.00");
    assert_eq!(price_in_dollars(0).to_string(), "0.00");
}
