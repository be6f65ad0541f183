// src/dashboard.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::chart::{self, BarSpec, ChartKind, MonthlySpec, PieSpec, TreemapSpec};
use crate::geo::{self, MapKind, MapLayer, Venue};
use crate::munge::{
    self, filter, pivot::median_total, ChekiRecord, GroupKey, MonthCount, Roster, SummaryTable,
};

/// When at least this many performers are multi-selected, the cutoff defaults
/// to the median total instead of zero.
const MEDIAN_CUTOFF_SELECTION: usize = 12;

/// One user interaction: everything the controls on the page can set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// Empty selection means every performer.
    pub selected: Vec<String>,
    pub group_by_date: bool,
    pub chart: ChartKind,
    pub map: MapKind,
    /// `None` applies the median-based default; `Some(0)` disables collapsing.
    pub cutoff: Option<u64>,
    /// `None` keeps every row.
    pub top_n: Option<usize>,
    pub use_groups: bool,
}

impl DashboardQuery {
    /// The view shown before the user touches any control: full date range,
    /// everyone, ranked bar chart over a heatmap.
    pub fn default_for(records: &[ChekiRecord]) -> Self {
        let (date_from, date_to) = filter::default_date_range(records);
        Self {
            date_from,
            date_to,
            selected: Vec::new(),
            group_by_date: false,
            chart: ChartKind::Bar,
            map: MapKind::Heat,
            cutoff: None,
            top_n: None,
            use_groups: false,
        }
    }
}

/// The chart actually chosen for this render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarSpec),
    Pie(PieSpec),
    Treemap(TreemapSpec),
}

/// One fully computed render pass. Ephemeral; recomputed from the source
/// tables on every interaction and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub summary: SummaryTable,
    pub grand_total: u64,
    pub chart: Option<ChartSpec>,
    pub monthly: Option<MonthlySpec>,
    pub map: Option<MapLayer>,
}

fn effective_cutoff(query: &DashboardQuery, table: &SummaryTable) -> u64 {
    match query.cutoff {
        Some(cutoff) => cutoff,
        None if query.selected.len() >= MEDIAN_CUTOFF_SELECTION => median_total(table),
        None => 0,
    }
}

/// Run the whole pipeline for one interaction. Pure: the same query over the
/// same inputs always yields the same view, and a zero-row result is a valid
/// view with the chart and map skipped.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub fn render(
    query: &DashboardQuery,
    records: &[ChekiRecord],
    roster: &Roster,
    venues: &[Venue],
) -> DashboardView {
    let ranged = filter::restrict_dates(records, query.date_from, query.date_to);
    let visible = filter::limit_to_selected(&ranged, &query.selected);

    let key = if query.group_by_date {
        GroupKey::DateName
    } else {
        GroupKey::Name
    };
    let ranked = munge::pivot(&visible, key, roster);
    let cutoff = effective_cutoff(query, &ranked);
    let mut summary = munge::apply_cutoff(ranked, cutoff);
    if let Some(n) = query.top_n {
        summary = munge::top_n(summary, n);
    }

    let chart = match query.chart {
        ChartKind::Bar => chart::bar(&summary).map(ChartSpec::Bar),
        ChartKind::Pie => chart::pie(&summary).map(ChartSpec::Pie),
        ChartKind::Treemap => {
            chart::treemap(&summary, query.use_groups).map(ChartSpec::Treemap)
        }
    };

    let series: Vec<MonthCount> = munge::monthly_series(&visible);
    let monthly = chart::monthly_bar(&series);
    let map = geo::layer(&geo::map_points(&visible, venues), query.map);

    DashboardView {
        grand_total: summary.grand_total(),
        summary,
        chart,
        monthly,
        map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn record(date: &str, name: &str, location: &str) -> ChekiRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        ChekiRecord {
            cheki_id: 0,
            date,
            year: date.year(),
            month: date.month(),
            location: location.to_string(),
            raw_label: name.to_string(),
            name: name.to_string(),
            group: name.to_string(),
            n_shown: 1,
        }
    }

    fn sample_records() -> Vec<ChekiRecord> {
        let mut rs = Vec::new();
        for _ in 0..5 {
            rs.push(record("2024-01-10", "Alice", "shibuya"));
        }
        for _ in 0..2 {
            rs.push(record("2024-02-01", "Bob", "akihabara"));
        }
        rs.push(record("2023-12-31", "Carol", "shibuya"));
        rs
    }

    fn sample_venues() -> Vec<Venue> {
        vec![Venue {
            location: "shibuya".to_string(),
            full_address: "Shibuya, Tokyo".to_string(),
            latitude: 35.658,
            longitude: 139.701,
        }]
    }

    #[test]
    fn default_query_renders_every_stage() {
        let records = sample_records();
        let query = DashboardQuery::default_for(&records);
        let view = render(&query, &records, &Roster::default(), &sample_venues());

        assert_eq!(view.grand_total, 8);
        assert_eq!(view.summary.rows[0].name, "Alice");
        assert!(matches!(view.chart, Some(ChartSpec::Bar(_))));
        assert!(view.monthly.is_some());
        assert!(matches!(view.map, Some(MapLayer::Heat { .. })));
    }

    #[test]
    fn date_range_and_selection_narrow_the_view() {
        let records = sample_records();
        let mut query = DashboardQuery::default_for(&records);
        query.date_from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        query.selected = vec!["Alice".to_string()];
        let view = render(&query, &records, &Roster::default(), &sample_venues());

        assert_eq!(view.summary.rows.len(), 1);
        assert_eq!(view.grand_total, 5);
    }

    #[test]
    fn cutoff_and_top_n_compose_in_order() {
        let records = sample_records();
        let mut query = DashboardQuery::default_for(&records);
        query.cutoff = Some(2);
        query.top_n = Some(2);
        let view = render(&query, &records, &Roster::default(), &sample_venues());

        // Carol (1) collapses into OTHERS, then top-2 keeps Alice and Bob.
        assert_eq!(view.summary.rows.len(), 2);
        assert_eq!(view.summary.rows[0].name, "Alice");
        assert_eq!(view.summary.rows[1].name, "Bob");
    }

    #[test]
    fn rendering_twice_yields_the_same_view() {
        let records = sample_records();
        let query = DashboardQuery::default_for(&records);
        let roster = Roster::default();
        let venues = sample_venues();
        let a = render(&query, &records, &roster, &venues);
        let b = render(&query, &records, &roster, &venues);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.chart, b.chart);
        assert_eq!(a.map, b.map);
    }

    #[test]
    fn empty_result_skips_chart_and_map() {
        let records = sample_records();
        let mut query = DashboardQuery::default_for(&records);
        query.selected = vec!["Nobody".to_string()];
        let view = render(&query, &records, &Roster::default(), &sample_venues());

        assert!(view.summary.is_empty());
        assert!(view.chart.is_none());
        assert!(view.monthly.is_none());
        assert!(view.map.is_none());
    }

    #[test]
    fn wide_selection_defaults_the_cutoff_to_the_median() {
        // 13 performers selected: seven with three records, six with one.
        let mut records = Vec::new();
        let mut selected = Vec::new();
        for i in 0..13 {
            let name = format!("P{:02}", i);
            selected.push(name.clone());
            let reps = if i < 7 { 3 } else { 1 };
            for _ in 0..reps {
                records.push(record("2024-01-01", &name, "shibuya"));
            }
        }
        let mut query = DashboardQuery::default_for(&records);
        query.selected = selected;
        let view = render(&query, &records, &Roster::default(), &sample_venues());

        // Median total is 3, so the single-record tail collapses into OTHERS.
        let others = view
            .summary
            .rows
            .iter()
            .find(|r| r.name == "OTHERS")
            .expect("tail should collapse");
        assert_eq!(others.total, 6);
        assert_eq!(view.grand_total, 27);
    }
}
