// src/geo/mod.rs

pub mod layers;

pub use layers::{layer, MapKind, MapLayer, ViewState};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::config::ColumnRoles;
use crate::fetch::Table;
use crate::munge::ChekiRecord;

/// One venue from the venues tab, joined into events by its location key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub location: String,
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Parse the venues tab, keeping only rows with a location key, an address
/// and parseable coordinates. Duplicate location keys keep the first row.
pub fn venues_from_table(table: &Table, roles: &ColumnRoles) -> Result<Vec<Venue>> {
    let location_col = table.require_column(&roles.venue_location)?;
    let latitude_col = table.require_column(&roles.venue_latitude)?;
    let longitude_col = table.require_column(&roles.venue_longitude)?;
    let address_col = table.require_column(&roles.venue_address)?;

    let mut venues: Vec<Venue> = Vec::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let location = row[location_col].trim();
        let address = row[address_col].trim();
        if location.is_empty() || address.is_empty() {
            continue;
        }
        let latitude = row[latitude_col].trim().parse::<f64>();
        let longitude = row[longitude_col].trim().parse::<f64>();
        let (latitude, longitude) = match (latitude, longitude) {
            (Ok(lat), Ok(lon)) => (lat, lon),
            _ => {
                warn!(row = row_idx, location, "skipping venue without coordinates");
                continue;
            }
        };
        if venues.iter().any(|v| v.location == location) {
            continue;
        }
        venues.push(Venue {
            location: location.to_string(),
            full_address: address.to_string(),
            latitude,
            longitude,
        });
    }
    Ok(venues)
}

/// A venue with its record count, ready to feed a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub location: String,
    pub full_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u64,
}

/// Count records per location key and inner-join the venue table on it.
/// Locations without a matching venue are dropped; venues without records do
/// not appear. Output is sorted by location key.
pub fn map_points(records: &[ChekiRecord], venues: &[Venue]) -> Vec<MapPoint> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for r in records {
        if !r.location.is_empty() {
            *counts.entry(r.location.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .filter_map(|(location, count)| {
            venues
                .iter()
                .find(|v| v.location == location)
                .map(|v| MapPoint {
                    location: v.location.clone(),
                    full_address: v.full_address.clone(),
                    latitude: v.latitude,
                    longitude: v.longitude,
                    count,
                })
        })
        .collect()
}
