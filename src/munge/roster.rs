// src/munge/roster.rs
use anyhow::Result;
use std::collections::HashMap;

use crate::config::ColumnRoles;
use crate::fetch::Table;

/// Group affiliation used when a performer is absent from the roster.
pub const SOLO_GROUP: &str = "Solo";

/// Canonical performer roster, looked up by exact name match.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    groups: HashMap<String, String>,
    names: Vec<String>,
}

impl Roster {
    pub fn from_table(table: &Table, roles: &ColumnRoles) -> Result<Self> {
        let name_col = table.require_column(&roles.roster_name)?;
        let group_col = table.require_column(&roles.roster_group)?;

        let mut groups = HashMap::new();
        let mut names = Vec::new();
        for row in table.rows() {
            let name = row[name_col].trim();
            if name.is_empty() {
                continue;
            }
            let group = row[group_col].trim();
            if !groups.contains_key(name) {
                names.push(name.to_string());
            }
            // later roster rows win, matching a sheet kept newest-last
            groups.insert(name.to_string(), group.to_string());
        }
        names.sort();
        Ok(Self { groups, names })
    }

    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.groups
            .get(name)
            .map(|g| g.as_str())
            .filter(|g| !g.is_empty())
    }

    /// Roster group for `name`, falling back to `Solo` for unknown performers.
    pub fn group_or_solo(&self, name: &str) -> String {
        self.group_of(name).unwrap_or(SOLO_GROUP).to_string()
    }

    /// Sorted distinct non-empty performer names, for the multi-select filter.
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_table(raw: &[&[&str]]) -> Table {
        let values = raw
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        Table::from_values(values).unwrap()
    }

    #[test]
    fn lookup_and_solo_fallback() -> Result<()> {
        let table = roster_table(&[
            &["name1", "group1"],
            &["Alice", "GroupX"],
            &["Bob", ""],
        ]);
        let roster = Roster::from_table(&table, &ColumnRoles::default())?;

        assert_eq!(roster.group_of("Alice"), Some("GroupX"));
        assert_eq!(roster.group_or_solo("Alice"), "GroupX");
        assert_eq!(roster.group_or_solo("Bob"), "Solo");
        assert_eq!(roster.group_or_solo("Unknown"), "Solo");
        Ok(())
    }

    #[test]
    fn all_names_are_sorted_and_skip_blanks() -> Result<()> {
        let table = roster_table(&[
            &["name1", "group1"],
            &["Zoe", "G"],
            &["", "G"],
            &["Alice", "G"],
        ]);
        let roster = Roster::from_table(&table, &ColumnRoles::default())?;
        assert_eq!(roster.all_names(), &["Alice", "Zoe"]);
        Ok(())
    }
}
