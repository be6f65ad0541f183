// src/config.rs
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::fetch::Table;

fn default_api_key_env() -> String {
    "SHEETS_API_KEY".to_string()
}
fn default_events_tab() -> u32 {
    0
}
fn default_roster_tab() -> u32 {
    1
}
fn default_venues_tab() -> u32 {
    3
}
fn default_cache_ttl_secs() -> u64 {
    600
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Explicit column-role mapping for the three worksheets. Column selection is
/// driven by this mapping rather than by substring probes over headers, so a
/// renamed sheet fails loudly at load time instead of silently dropping data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnRoles {
    /// Events tab: acquisition date column.
    pub date: String,
    /// Events tab: venue key column.
    pub location: String,
    /// Events tab: performer columns are those whose header starts with this
    /// prefix ("name" matches name1, name2, ...).
    pub name_prefix: String,
    /// Roster tab: canonical performer name column.
    pub roster_name: String,
    /// Roster tab: group affiliation column.
    pub roster_group: String,
    /// Venues tab.
    pub venue_location: String,
    pub venue_latitude: String,
    pub venue_longitude: String,
    pub venue_address: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            location: "location".to_string(),
            name_prefix: "name".to_string(),
            roster_name: "name1".to_string(),
            roster_group: "group1".to_string(),
            venue_location: "location".to_string(),
            venue_latitude: "latitude".to_string(),
            venue_longitude: "longitude".to_string(),
            venue_address: "full_address".to_string(),
        }
    }
}

impl ColumnRoles {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("date", &self.date),
            ("location", &self.location),
            ("name_prefix", &self.name_prefix),
            ("roster_name", &self.roster_name),
            ("roster_group", &self.roster_group),
            ("venue_location", &self.venue_location),
            ("venue_latitude", &self.venue_latitude),
            ("venue_longitude", &self.venue_longitude),
            ("venue_address", &self.venue_address),
        ];
        for (role, value) in fields {
            if value.trim().is_empty() {
                bail!("column role `{}` must not be empty", role);
            }
        }
        Ok(())
    }

    /// Indices of the performer columns in the events tab, in header order.
    /// An events sheet with no matching column is a schema error.
    pub fn name_columns(&self, events: &Table) -> Result<Vec<usize>> {
        let cols: Vec<usize> = events
            .headers()
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(&self.name_prefix))
            .map(|(i, _)| i)
            .collect();
        if cols.is_empty() {
            bail!(
                "events sheet has no `{}*` columns (headers: {:?})",
                self.name_prefix,
                events.headers()
            );
        }
        Ok(cols)
    }
}

/// Process configuration, loaded once at startup from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub spreadsheet_id: String,
    /// Inline API key; when absent the key is read from `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_events_tab")]
    pub events_tab: u32,
    #[serde(default = "default_roster_tab")]
    pub roster_tab: u32,
    #[serde(default = "default_venues_tab")]
    pub venues_tab: u32,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub roles: ColumnRoles,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {:?}", path))?;
        let config: Config =
            serde_yaml::from_str(&raw).with_context(|| format!("parsing config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            bail!("spreadsheet_id must not be empty");
        }
        if self.cache_ttl_secs == 0 {
            bail!("cache_ttl_secs must be greater than zero");
        }
        let tabs = [self.events_tab, self.roster_tab, self.venues_tab];
        if tabs[0] == tabs[1] || tabs[0] == tabs[2] || tabs[1] == tabs[2] {
            bail!(
                "events/roster/venues tab indices must be distinct (got {:?})",
                tabs
            );
        }
        self.roles.validate()
    }

    /// The API key, either inline or from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .with_context(|| format!("API key env var `{}` is not set", self.api_key_env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn minimal_config_uses_upstream_sheet_defaults() -> Result<()> {
        let f = write_config("spreadsheet_id: abc123\n");
        let config = Config::load(f.path())?;
        assert_eq!(config.events_tab, 0);
        assert_eq!(config.roster_tab, 1);
        assert_eq!(config.venues_tab, 3);
        assert_eq!(config.cache_ttl_secs, 600);
        assert_eq!(config.roles.date, "date");
        assert_eq!(config.roles.roster_group, "group1");
        Ok(())
    }

    #[test]
    fn duplicate_tab_indices_are_rejected() {
        let f = write_config("spreadsheet_id: abc123\nroster_tab: 0\n");
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let f = write_config("spreadsheet_id: abc123\ncache_ttl_secs: 0\n");
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn empty_role_is_rejected() {
        let f = write_config("spreadsheet_id: abc123\nroles:\n  date: \"\"\n");
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let f = write_config("spreadsheet_id: abc123\nretries: 5\n");
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn name_columns_match_by_prefix_in_header_order() -> Result<()> {
        let roles = ColumnRoles::default();
        let table = Table::from_values(vec![
            vec![
                "date".to_string(),
                "name1".to_string(),
                "location".to_string(),
                "name2".to_string(),
            ],
            vec![String::new(), String::new(), String::new(), String::new()],
        ])?;
        assert_eq!(roles.name_columns(&table)?, vec![1, 3]);
        Ok(())
    }

    #[test]
    fn missing_name_columns_are_a_schema_error() -> Result<()> {
        let roles = ColumnRoles::default();
        let table = Table::from_values(vec![
            vec!["date".to_string(), "location".to_string()],
            vec![String::new(), String::new()],
        ])?;
        assert!(roles.name_columns(&table).is_err());
        Ok(())
    }
}
