use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::markers::{MapSurface, MarkerSpec};
use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

/// Initial view over the Indian subcontinent.
pub const DEFAULT_VIEW: MapView = MapView {
    center: GeoPoint::new(20.5937, 78.9629),
    zoom: 5,
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BoardMarker {
    pub id: u64,
    #[serde(flatten)]
    pub spec: MarkerSpec,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BoardState {
    pub view: MapView,
    pub markers: Vec<BoardMarker>,
}

/// In-memory map surface served to browser clients. Marker ids only ever
/// grow, so a client can tell a fresh marker set from a stale one.
#[derive(Debug)]
pub struct MarkerBoard {
    next_id: u64,
    markers: BTreeMap<u64, MarkerSpec>,
    view: MapView,
}

impl Default for MarkerBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerBoard {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            markers: BTreeMap::new(),
            view: DEFAULT_VIEW,
        }
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn state(&self) -> BoardState {
        BoardState {
            view: self.view,
            markers: self
                .markers
                .iter()
                .map(|(id, spec)| BoardMarker {
                    id: *id,
                    spec: spec.clone(),
                })
                .collect(),
        }
    }
}

impl MapSurface for MarkerBoard {
    type Handle = u64;

    fn add_marker(&mut self, spec: &MarkerSpec) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.markers.insert(id, spec.clone());
        id
    }

    fn remove_marker(&mut self, handle: u64) {
        self.markers.remove(&handle);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.view = MapView { center, zoom };
    }
}
