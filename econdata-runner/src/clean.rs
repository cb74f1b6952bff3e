//! Normalizer/cleaner for the concatenated adapter output.
//!
//! Adapters already drop raw values they cannot convert. What reaches this
//! stage is structurally valid, so a value that still is not a usable number
//! is nulled rather than dropped.

use std::cmp::Ordering;

use econdata_core::ObservationRecord;

/// Drop incomplete records, null non-finite values, and sort by
/// (country, year, indicator name).
///
/// The sort is stable, so records with equal keys keep their fetch order.
/// Running `clean` on its own output returns the same records.
pub fn clean(records: Vec<ObservationRecord>) -> Vec<ObservationRecord> {
    let mut cleaned: Vec<ObservationRecord> = records
        .into_iter()
        .filter(is_complete)
        .map(coerce_value)
        .collect();
    cleaned.sort_by(sort_order);
    cleaned
}

/// A record needs a country and an indicator name to be kept.
pub fn is_complete(record: &ObservationRecord) -> bool {
    !record.country_code.trim().is_empty()
        && !record.country_name.trim().is_empty()
        && !record.indicator_name.trim().is_empty()
}

fn coerce_value(mut record: ObservationRecord) -> ObservationRecord {
    record.value = record.value.filter(|v| v.is_finite());
    record
}

/// Ordering of exported rows.
pub fn sort_order(a: &ObservationRecord, b: &ObservationRecord) -> Ordering {
    a.country_name
        .cmp(&b.country_name)
        .then(a.year.cmp(&b.year))
        .then_with(|| a.indicator_name.cmp(&b.indicator_name))
}
