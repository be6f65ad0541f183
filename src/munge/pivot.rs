// src/munge/pivot.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

use super::flatten::ChekiRecord;
use super::roster::Roster;

/// Label of the synthetic row that absorbs everything below the cutoff.
pub const OTHERS: &str = "OTHERS";

/// Which key set the summary is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Name,
    DateName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Set when grouping by (date, name).
    pub date: Option<NaiveDate>,
    pub name: String,
    pub group: String,
    pub total: u64,
    /// Count per distinct `n_shown` value, parallel to
    /// `SummaryTable::n_shown_values`. Sums to `total`.
    pub by_n_shown: Vec<u64>,
}

/// The pivoted summary: one row per group key, one breakdown column per
/// distinct `n_shown` value, sorted descending by total (ties broken by the
/// breakdown columns left to right). Ephemeral, recomputed per interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Distinct `n_shown` values, ascending.
    pub n_shown_values: Vec<u64>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn grand_total(&self) -> u64 {
        self.rows.iter().map(|r| r.total).sum()
    }
}

/// Pivot flattened records into a `SummaryTable`. Group affiliation comes
/// from the roster, with unknown performers falling back to `Solo`. The
/// result does not depend on input record order.
#[instrument(level = "debug", skip_all, fields(records = records.len(), key = ?key))]
pub fn pivot(records: &[ChekiRecord], key: GroupKey, roster: &Roster) -> SummaryTable {
    let mut n_shown_values: Vec<u64> = records.iter().map(|r| r.n_shown).collect();
    n_shown_values.sort_unstable();
    n_shown_values.dedup();
    let col_of: HashMap<u64, usize> = n_shown_values
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();

    // BTreeMap gives a deterministic base order before the ranking sort.
    let mut cells: BTreeMap<(Option<NaiveDate>, String), Vec<u64>> = BTreeMap::new();
    for r in records {
        let date = match key {
            GroupKey::Name => None,
            GroupKey::DateName => Some(r.date),
        };
        let counts = cells
            .entry((date, r.name.clone()))
            .or_insert_with(|| vec![0; n_shown_values.len()]);
        counts[col_of[&r.n_shown]] += 1;
    }

    let mut rows: Vec<SummaryRow> = cells
        .into_iter()
        .map(|((date, name), by_n_shown)| {
            let group = roster.group_or_solo(&name);
            SummaryRow {
                date,
                group,
                total: by_n_shown.iter().sum(),
                by_n_shown,
                name,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| b.by_n_shown.cmp(&a.by_n_shown))
    });

    SummaryTable {
        n_shown_values,
        rows,
    }
}

/// Collapse every row with `total < cutoff` into a single `OTHERS` row whose
/// totals are the exact sums of the collapsed rows. A cutoff of zero disables
/// collapsing; when nothing falls below the cutoff the table is unchanged.
pub fn apply_cutoff(mut table: SummaryTable, cutoff: u64) -> SummaryTable {
    if cutoff == 0 {
        return table;
    }
    let collapsed: Vec<SummaryRow> = table
        .rows
        .iter()
        .filter(|r| r.total < cutoff)
        .cloned()
        .collect();
    if collapsed.is_empty() {
        return table;
    }
    table.rows.retain(|r| r.total >= cutoff);

    let mut by_n_shown = vec![0u64; table.n_shown_values.len()];
    let mut total = 0u64;
    for row in &collapsed {
        total += row.total;
        for (acc, v) in by_n_shown.iter_mut().zip(&row.by_n_shown) {
            *acc += v;
        }
    }
    table.rows.push(SummaryRow {
        date: None,
        name: OTHERS.to_string(),
        group: OTHERS.to_string(),
        total,
        by_n_shown,
    });
    table
}

/// Keep the first `n` (already ranked) rows. Idempotent.
pub fn top_n(mut table: SummaryTable, n: usize) -> SummaryTable {
    table.rows.truncate(n);
    table
}

/// Rounded median of the row totals; zero for an empty table. Used as the
/// default cutoff when many performers are selected at once.
pub fn median_total(table: &SummaryTable) -> u64 {
    if table.rows.is_empty() {
        return 0;
    }
    let mut totals: Vec<u64> = table.rows.iter().map(|r| r.total).collect();
    totals.sort_unstable();
    let mid = totals.len() / 2;
    if totals.len() % 2 == 1 {
        totals[mid]
    } else {
        ((totals[mid - 1] + totals[mid]) as f64 / 2.0).round() as u64
    }
}

/// Per-calendar-month record counts, keyed by the first day of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: NaiveDate,
    pub count: u64,
}

pub fn monthly_series(records: &[ChekiRecord]) -> Vec<MonthCount> {
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for r in records {
        // day 1 always exists for a valid (year, month)
        if let Some(start) = r.date.with_day(1) {
            *buckets.entry(start).or_insert(0) += 1;
        }
    }
    buckets
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}
