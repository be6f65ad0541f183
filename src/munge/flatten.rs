// src/munge/flatten.rs
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::parse::split_name_group;
use crate::config::ColumnRoles;
use crate::fetch::Table;

/// One (event, performer) pair: the unit of counting. A single source row
/// with three filled name columns yields three of these, each with
/// `n_shown == 3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChekiRecord {
    /// Zero-based source row index, shared by records from the same photo.
    pub cheki_id: usize,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub location: String,
    /// The cell as written in the sheet, before label parsing.
    pub raw_label: String,
    pub name: String,
    pub group: String,
    /// How many performers appeared together in this photo.
    pub n_shown: u64,
}

/// Sheet dates appear both dash- and slash-separated.
pub fn parse_sheet_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .with_context(|| format!("unparseable date {:?}", raw))
}

/// Flatten the wide event log into one record per (event, performer) pair.
///
/// Emission order is source row order, then name-column order. Rows whose
/// cells are all empty are skipped; any other row must carry a parseable
/// date. The total number of emitted records equals the number of non-empty
/// name cells across the sheet.
#[instrument(level = "debug", skip_all, fields(rows = events.len()))]
pub fn flatten(events: &Table, roles: &ColumnRoles) -> Result<Vec<ChekiRecord>> {
    let date_col = events.require_column(&roles.date)?;
    let location_col = events.require_column(&roles.location)?;
    let name_cols = roles.name_columns(events)?;

    let mut records = Vec::new();
    for (row_idx, row) in events.rows().iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let filled: Vec<usize> = name_cols
            .iter()
            .copied()
            .filter(|&c| !row[c].trim().is_empty())
            .collect();
        if filled.is_empty() {
            continue;
        }
        let n_shown = filled.len() as u64;

        let date = parse_sheet_date(&row[date_col])
            .with_context(|| format!("event row {}", row_idx))?;
        let location = row[location_col].trim().to_string();

        for col in filled {
            let raw_label = row[col].trim().to_string();
            let (name, group) = split_name_group(&raw_label)
                .with_context(|| format!("event row {}", row_idx))?;
            records.push(ChekiRecord {
                cheki_id: row_idx,
                date,
                year: date.year(),
                month: date.month(),
                location: location.clone(),
                raw_label,
                name,
                group,
                n_shown,
            });
        }
    }
    Ok(records)
}
