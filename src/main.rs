use anyhow::{Context, Result};
use chekidash::{
    config::Config,
    dashboard::{self, DashboardQuery},
    fetch::{SheetsClient, TabCache},
    geo,
    munge::{self, Roster},
};
use reqwest::Client;
use std::{fs, path::Path, time::Duration};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const CONFIG_ENV: &str = "CHEKIDASH_CONFIG";
const CONFIG_DEFAULT: &str = "chekidash.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config, build adapters once ─────────────────────────
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_DEFAULT.to_string());
    let config = Config::load(&config_path)?;
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("creating output directory {:?}", config.out_dir))?;

    let sheets = SheetsClient::new(
        Client::new(),
        config.spreadsheet_id.clone(),
        config.api_key()?,
    );
    let cache = TabCache::new(Duration::from_secs(config.cache_ttl_secs));

    // ─── 3) fetch the three tabs concurrently ────────────────────────
    let (events, roster_tab, venues_tab) = futures::future::try_join3(
        cache.get_or_fetch(&sheets, config.events_tab),
        cache.get_or_fetch(&sheets, config.roster_tab),
        cache.get_or_fetch(&sheets, config.venues_tab),
    )
    .await?;
    info!(
        events = events.len(),
        roster = roster_tab.len(),
        venues = venues_tab.len(),
        "fetched worksheets"
    );

    // ─── 4) normalize ────────────────────────────────────────────────
    let records = munge::flatten(&events, &config.roles)?;
    let roster = Roster::from_table(&roster_tab, &config.roles)?;
    let venues = geo::venues_from_table(&venues_tab, &config.roles)?;
    info!(
        records = records.len(),
        performers = roster.all_names().len(),
        venues = venues.len(),
        "normalized"
    );

    // ─── 5) render the default view and emit its pieces ──────────────
    let query = DashboardQuery::default_for(&records);
    let view = dashboard::render(&query, &records, &roster, &venues);
    info!(grand_total = view.grand_total, "rendered default view");

    write_json(&config.out_dir.join("records.json"), &records)?;
    write_json(&config.out_dir.join("summary.json"), &view.summary)?;
    write_json(&config.out_dir.join("chart.json"), &view.chart)?;
    write_json(&config.out_dir.join("monthly.json"), &view.monthly)?;
    write_json(&config.out_dir.join("map.json"), &view.map)?;

    info!(out_dir = %config.out_dir.display(), "all done");
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {:?}", path))?;
    info!(path = %path.display(), "wrote");
    Ok(())
}
