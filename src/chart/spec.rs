// src/chart/spec.rs
use serde::{Deserialize, Serialize};

use super::palette::color_for;
use crate::munge::{MonthCount, SummaryTable};

/// Which chart the dashboard should draw from a summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Treemap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarEntry {
    pub name: String,
    pub total: u64,
    pub color: String,
}

/// Horizontal bar chart: one bar per name, largest first, bar labels carrying
/// the count, title carrying the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSpec {
    pub title: String,
    pub bars: Vec<BarEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
    pub color: String,
}

/// Pie chart with value+label text placed inside the slices, smallest slice
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieSpec {
    pub slices: Vec<PieSlice>,
    pub text_position: String,
    pub text_info: String,
}

/// One treemap leaf. The path is `[name]`, or `[group, name]` when grouping
/// is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreemapLeaf {
    pub path: Vec<String>,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreemapSpec {
    pub leaves: Vec<TreemapLeaf>,
}

fn total_title(table: &SummaryTable) -> String {
    format!("結果: {}枚数", table.grand_total())
}

/// All builders return `None` for an empty table so the dashboard can skip
/// the chart instead of drawing an empty frame.
pub fn bar(table: &SummaryTable) -> Option<BarSpec> {
    if table.is_empty() {
        return None;
    }
    let mut rows: Vec<_> = table.rows.iter().collect();
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    Some(BarSpec {
        title: total_title(table),
        bars: rows
            .into_iter()
            .map(|r| BarEntry {
                name: r.name.clone(),
                total: r.total,
                color: color_for(&r.name).to_string(),
            })
            .collect(),
    })
}

pub fn pie(table: &SummaryTable) -> Option<PieSpec> {
    if table.is_empty() {
        return None;
    }
    let mut rows: Vec<_> = table.rows.iter().collect();
    rows.sort_by(|a, b| a.total.cmp(&b.total));
    Some(PieSpec {
        slices: rows
            .into_iter()
            .map(|r| PieSlice {
                name: r.name.clone(),
                value: r.total,
                color: color_for(&r.name).to_string(),
            })
            .collect(),
        text_position: "inside".to_string(),
        text_info: "value+label".to_string(),
    })
}

pub fn treemap(table: &SummaryTable, use_groups: bool) -> Option<TreemapSpec> {
    if table.is_empty() {
        return None;
    }
    Some(TreemapSpec {
        leaves: table
            .rows
            .iter()
            .map(|r| {
                let path = if use_groups {
                    vec![r.group.clone(), r.name.clone()]
                } else {
                    vec![r.name.clone()]
                };
                TreemapLeaf {
                    path,
                    value: r.total,
                    color: color_for(&r.name).to_string(),
                }
            })
            .collect(),
    })
}

/// Per-month acquisition counts as a vertical bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySpec {
    pub months: Vec<MonthCount>,
}

pub fn monthly_bar(series: &[MonthCount]) -> Option<MonthlySpec> {
    if series.is_empty() {
        return None;
    }
    Some(MonthlySpec {
        months: series.to_vec(),
    })
}
