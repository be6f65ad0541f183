// src/munge/filter.rs
use chrono::{Datelike, NaiveDate, Utc};

use super::flatten::ChekiRecord;

/// Records within the inclusive `[from, to]` date range.
pub fn restrict_dates(records: &[ChekiRecord], from: NaiveDate, to: NaiveDate) -> Vec<ChekiRecord> {
    records
        .iter()
        .filter(|r| r.date >= from && r.date <= to)
        .cloned()
        .collect()
}

/// Keep only records for the selected performer names. An empty selection
/// means "everyone" and leaves the input untouched.
pub fn limit_to_selected(records: &[ChekiRecord], selected: &[String]) -> Vec<ChekiRecord> {
    if selected.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selected.iter().any(|s| s == &r.name))
        .cloned()
        .collect()
}

/// Default date range for the selector: earliest record date through today.
/// With no records, the range starts at January 1 of the current year.
pub fn default_date_range(records: &[ChekiRecord]) -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    let first = records
        .iter()
        .map(|r| r.date)
        .min()
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today));
    (first, today)
}
