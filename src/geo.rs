use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Point at fraction `t` of the straight coordinate segment towards `to`.
    pub fn lerp(&self, to: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (to.lat - self.lat) * t,
            lon: self.lon + (to.lon - self.lon) * t,
        }
    }

    pub fn bearing_to(&self, to: GeoPoint) -> f64 {
        initial_bearing(*self, to)
    }
}

/// Initial great-circle bearing from `from` to `to`, degrees clockwise from
/// north in [0, 360).
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_heading(x.atan2(y).to_degrees())
}

/// Fold any angle in degrees into [0, 360).
pub fn normalize_heading(deg: f64) -> f64 {
    let folded = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Geographic query window, south/north latitudes and west/east longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}
