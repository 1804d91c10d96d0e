//! Validation of raw picking records before aggregation.

use chrono::{NaiveDate, NaiveDateTime};
use core_types::{IngestStats, RawTransaction, Transaction};
use tracing::debug;

/// The outcome of normalizing one batch of raw records: the surviving
/// transactions plus the per-cause drop counts.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub transactions: Vec<Transaction>,
    pub stats: IngestStats,
}

/// Validates required fields and coerces timestamps.
///
/// Records with a missing item code or a missing/unparsable timestamp are
/// dropped and counted; nothing here is ever fatal. Input order is preserved
/// for the survivors, which is what makes the downstream tie-breaks
/// deterministic.
pub fn normalize(records: &[RawTransaction]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    batch.stats.total_records = records.len();

    for record in records {
        let item_code = record.item_code.trim();
        if item_code.is_empty() {
            batch.stats.dropped_missing_item_code += 1;
            debug!("dropping record without item code");
            continue;
        }

        let picked_at = record
            .picked_at
            .as_deref()
            .and_then(|text| parse_timestamp(text.trim()));
        let Some(picked_at) = picked_at else {
            batch.stats.dropped_bad_timestamp += 1;
            debug!(
                item_code,
                raw = record.picked_at.as_deref().unwrap_or(""),
                "dropping record with missing or unparsable timestamp"
            );
            continue;
        };

        batch.transactions.push(Transaction {
            item_code: item_code.to_string(),
            item_name: record.item_name.clone().filter(|n| !n.trim().is_empty()),
            zone: record.zone.clone().filter(|z| !z.trim().is_empty()),
            quantity: record.quantity,
            picked_at,
        });
    }

    batch.stats.accepted = batch.transactions.len();
    batch
}

/// Parses the timestamp forms the warehouse exports actually produce:
/// ISO date-times with or without a `T` separator and fractional seconds,
/// and bare dates (treated as midnight). Exposed so boundary adapters can
/// apply date-range filters with the exact same coercion rules.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    for format in FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
