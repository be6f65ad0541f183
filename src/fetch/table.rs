// src/fetch/table.rs
use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapse every run of whitespace to a single space and trim the ends.
pub fn collapse_ws(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Header cells are lowercased and their words joined with underscores,
/// so "Full Address" becomes "full_address".
fn normalize_header(s: &str) -> String {
    collapse_ws(s).to_lowercase().replace(' ', "_")
}

/// A rectangular worksheet snapshot. The first raw row is promoted to
/// normalized column headers and removed from the data; short rows are padded
/// with empty cells so every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_values(mut values: Vec<Vec<String>>) -> Result<Self> {
        if values.is_empty() {
            bail!("worksheet returned no rows; expected at least a header row");
        }
        let headers: Vec<String> = values
            .remove(0)
            .iter()
            .map(|h| normalize_header(h))
            .collect();
        let width = headers.len();
        let rows = values
            .into_iter()
            .map(|mut row| {
                row.truncate(width);
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like `column_index`, but missing columns are an error naming what the
    /// sheet actually carries.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        match self.column_index(name) {
            Some(idx) => Ok(idx),
            None => bail!(
                "worksheet has no `{}` column (headers: {:?})",
                name,
                self.headers
            ),
        }
    }
}
