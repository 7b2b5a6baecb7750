use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::GeoPoint;

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";

/// Where a record came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provenance {
    Live,
    Synthetic,
}

/// Display color bucket derived from altitude.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AltitudeBand {
    High,
    Upper,
    Middle,
    Lower,
    Low,
}

impl AltitudeBand {
    pub const ALL: [AltitudeBand; 5] = [
        AltitudeBand::High,
        AltitudeBand::Upper,
        AltitudeBand::Middle,
        AltitudeBand::Lower,
        AltitudeBand::Low,
    ];

    /// Thresholds are strict: exactly 35000 ft is still `Upper`.
    pub fn from_feet(altitude_ft: u32) -> Self {
        match altitude_ft {
            a if a > 35_000 => AltitudeBand::High,
            a if a > 30_000 => AltitudeBand::Upper,
            a if a > 20_000 => AltitudeBand::Middle,
            a if a > 10_000 => AltitudeBand::Lower,
            _ => AltitudeBand::Low,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            AltitudeBand::High => "#0000ff",
            AltitudeBand::Upper => "#00ff00",
            AltitudeBand::Middle => "#ffff00",
            AltitudeBand::Lower => "#ff7f00",
            AltitudeBand::Low => "#ff0000",
        }
    }

    /// Parse a comma separated list such as `high,low`. Blank input is the
    /// empty set, which filters nothing.
    pub fn parse_set(input: &str) -> Result<BTreeSet<AltitudeBand>, String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(AltitudeBand::from_str)
            .collect()
    }
}

impl FromStr for AltitudeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AltitudeBand::ALL
            .into_iter()
            .find(|band| {
                let name: &'static str = band.into();
                name.eq_ignore_ascii_case(s.trim())
            })
            .ok_or_else(|| format!("unknown altitude band: {s}"))
    }
}

/// One aircraft as presented on the map and in the list. Rebuilt from
/// scratch on every refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FlightRecord {
    /// Callsign or synthetic flight number.
    pub code: String,
    pub icao24: Option<String>,
    pub position: GeoPoint,
    pub altitude_ft: u32,
    pub speed_kts: u32,
    /// Degrees clockwise from north, [0, 360).
    pub heading_deg: f64,
    pub airline: String,
    pub country: String,
    pub departure: String,
    pub arrival: String,
    /// Epoch seconds.
    pub last_update: i64,
    pub provenance: Provenance,
}

impl FlightRecord {
    pub fn band(&self) -> AltitudeBand {
        AltitudeBand::from_feet(self.altitude_ft)
    }

    pub fn is_regional(&self, region: &str) -> bool {
        !region.is_empty() && self.country.eq_ignore_ascii_case(region)
    }
}
