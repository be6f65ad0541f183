// src/fetch/sheets.rs
use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::table::Table;

const DEFAULT_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: u32,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Adapter over the Sheets values API. Holds its own HTTP client, endpoint and
/// credentials so callers construct it once at startup and pass it around.
///
/// Failures (auth, not-found, rate limit) propagate to the caller as-is; there
/// is no retry here, the surrounding cache is the only smoothing layer.
pub struct SheetsClient {
    client: Client,
    base: Url,
    spreadsheet_id: String,
    api_key: String,
}

impl SheetsClient {
    pub fn new(client: Client, spreadsheet_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base = Url::parse(DEFAULT_BASE).expect("default Sheets endpoint URL");
        Self {
            client,
            base,
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Point the adapter at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = base;
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("Sheets endpoint URL cannot be a base"))?;
            path.pop_if_empty();
            path.push(&self.spreadsheet_id);
            for seg in segments {
                path.push(seg);
            }
        }
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Resolve a zero-based tab index to its title via the metadata endpoint.
    async fn tab_title(&self, index: u32) -> Result<String> {
        let mut url = self.endpoint(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties");
        let meta: SpreadsheetMeta = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET spreadsheet metadata for {}", self.spreadsheet_id))?
            .error_for_status()?
            .json()
            .await
            .context("decoding spreadsheet metadata")?;

        meta.sheets
            .into_iter()
            .find(|s| s.properties.index == index)
            .map(|s| s.properties.title)
            .ok_or_else(|| {
                anyhow!(
                    "spreadsheet {} has no tab at index {}",
                    self.spreadsheet_id,
                    index
                )
            })
    }

    /// Fetch one tab by index and promote its first row to headers.
    #[instrument(level = "info", skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    pub async fn fetch_tab(&self, index: u32) -> Result<Table> {
        let title = self.tab_title(index).await?;
        debug!(tab = %title, "resolved tab title");

        let mut url = self.endpoint(&["values", &title])?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");

        let range: ValueRange = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET values for tab `{}`", title))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("decoding values for tab `{}`", title))?;

        if range.values.is_empty() {
            bail!("tab `{}` returned no values", title);
        }
        Table::from_values(range.values)
    }
}
