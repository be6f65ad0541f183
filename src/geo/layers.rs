// src/geo/layers.rs
use serde::{Deserialize, Serialize};

use super::MapPoint;

/// Which deck layer the dashboard should draw over the venue points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    Heat,
    Column,
    Scatter,
}

/// Initial camera over central Tokyo; the column layer tilts the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u32,
    pub pitch: u32,
}

const VIEW_LATITUDE: f64 = 35.678942;
const VIEW_LONGITUDE: f64 = 139.737892;
const VIEW_ZOOM: u32 = 10;

impl ViewState {
    fn for_kind(kind: MapKind) -> Self {
        Self {
            latitude: VIEW_LATITUDE,
            longitude: VIEW_LONGITUDE,
            zoom: VIEW_ZOOM,
            pitch: match kind {
                MapKind::Column => 50,
                _ => 0,
            },
        }
    }
}

/// Renderer-agnostic layer description. The knobs mirror what the deck
/// renderer expects for each layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapLayer {
    Heat {
        view: ViewState,
        tooltip: String,
        opacity: f64,
        /// Point weight comes from the record count.
        weight_field: String,
        points: Vec<MapPoint>,
    },
    Column {
        view: ViewState,
        tooltip: String,
        elevation_scale: u32,
        radius: u32,
        extruded: bool,
        points: Vec<MapPoint>,
    },
    Scatter {
        view: ViewState,
        tooltip: String,
        opacity: f64,
        fill_color: [u8; 4],
        radius_scale: u32,
        min_radius_pixels: u32,
        max_radius_pixels: u32,
        points: Vec<MapPoint>,
    },
}

const TOOLTIP: &str = "Location:{full_address}, count: {count}";

/// Build the layer spec for `kind`, or `None` when there is nothing to plot.
pub fn layer(points: &[MapPoint], kind: MapKind) -> Option<MapLayer> {
    if points.is_empty() {
        return None;
    }
    let view = ViewState::for_kind(kind);
    let points = points.to_vec();
    Some(match kind {
        MapKind::Heat => MapLayer::Heat {
            view,
            tooltip: TOOLTIP.to_string(),
            opacity: 0.9,
            weight_field: "count".to_string(),
            points,
        },
        MapKind::Column => MapLayer::Column {
            view,
            tooltip: TOOLTIP.to_string(),
            elevation_scale: 100,
            radius: 50,
            extruded: true,
            points,
        },
        MapKind::Scatter => MapLayer::Scatter {
            view,
            tooltip: TOOLTIP.to_string(),
            opacity: 0.5,
            fill_color: [200, 30, 0, 160],
            radius_scale: 10,
            min_radius_pixels: 10,
            max_radius_pixels: 200,
            points,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> MapPoint {
        MapPoint {
            location: "shibuya".to_string(),
            full_address: "Shibuya, Tokyo".to_string(),
            latitude: 35.658,
            longitude: 139.701,
            count: 3,
        }
    }

    #[test]
    fn column_layer_tilts_the_camera() {
        let layer = layer(&[point()], MapKind::Column).unwrap();
        match layer {
            MapLayer::Column { view, extruded, .. } => {
                assert_eq!(view.pitch, 50);
                assert!(extruded);
            }
            other => panic!("expected a column layer, got {:?}", other),
        }
    }

    #[test]
    fn flat_layers_keep_zero_pitch() {
        for kind in [MapKind::Heat, MapKind::Scatter] {
            let layer = layer(&[point()], kind).unwrap();
            let view = match layer {
                MapLayer::Heat { view, .. } => view,
                MapLayer::Scatter { view, .. } => view,
                MapLayer::Column { view, .. } => view,
            };
            assert_eq!(view.pitch, 0);
            assert_eq!(view.zoom, 10);
        }
    }

    #[test]
    fn no_points_means_no_layer() {
        assert!(layer(&[], MapKind::Heat).is_none());
    }

    #[test]
    fn layers_serialize_with_a_kind_tag() {
        let json = serde_json::to_value(layer(&[point()], MapKind::Scatter).unwrap()).unwrap();
        assert_eq!(json["kind"], "scatter");
        assert_eq!(json["fill_color"][0], 200);
    }
}
