//! Split flattened keys into `Segment` and `Ship_Mode`.

use crate::models::{MeltedRecord, TOTAL_SHIP_MODE};

use super::header::KEY_SEPARATOR;

/// Suffix left on segment names by subtotal columns.
pub const TOTAL_SUFFIX: &str = "_Total";

/// A record with its key split but its amount still raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord {
    pub order_id: String,
    pub segment: String,
    pub ship_mode: String,
    pub raw_amount: String,
}

/// Split on the first `_` only.
///
/// Ship-mode labels may contain further underscores; segment names must not,
/// as anything after the first separator is read as the ship mode.
pub fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once(KEY_SEPARATOR) {
        Some((segment, ship_mode)) => (segment, Some(ship_mode)),
        None => (key, None),
    }
}

/// Remove every `_Total` occurrence from a segment name.
pub fn clean_segment(segment: &str) -> String {
    segment.replace(TOTAL_SUFFIX, "")
}

/// Ship mode, or [`TOTAL_SHIP_MODE`] when the key had none.
pub fn ship_mode_or_total(ship_mode: Option<&str>) -> String {
    ship_mode.unwrap_or(TOTAL_SHIP_MODE).to_string()
}

/// Split and clean one melted record.
pub fn split_record(record: MeltedRecord) -> KeyedRecord {
    let (segment, ship_mode) = split_key(&record.key);
    KeyedRecord {
        segment: clean_segment(segment),
        ship_mode: ship_mode_or_total(ship_mode),
        order_id: record.order_id,
        raw_amount: record.value,
    }
}

pub fn split_records(records: Vec<MeltedRecord>) -> Vec<KeyedRecord> {
    records.into_iter().map(split_record).collect()
}
