use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::Catalog;
use crate::flights::types::{FlightRecord, Provenance, NOT_AVAILABLE, UNKNOWN_LABEL};
use crate::geo::{normalize_heading, GeoPoint};

pub const METERS_TO_FEET: f64 = 3.28084;
pub const MS_TO_KNOTS: f64 = 1.94384;

// OpenSky state vector layout
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_TRUE_TRACK: usize = 10;
const IDX_GEO_ALTITUDE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    MissingPosition,
    MissingIdentity,
    OnGround,
}

#[derive(Debug, Default)]
pub struct Normalized {
    pub flights: Vec<FlightRecord>,
    pub rejected: BTreeMap<Rejection, usize>,
}

impl Normalized {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

pub fn meters_to_feet(meters: f64) -> u32 {
    (meters * METERS_TO_FEET).round().max(0.0) as u32
}

pub fn ms_to_knots(meters_per_second: f64) -> u32 {
    (meters_per_second * MS_TO_KNOTS).round().max(0.0) as u32
}

/// Turns provider state vectors into [`FlightRecord`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    catalog: Arc<Catalog>,
    airborne_only: bool,
}

impl Normalizer {
    pub fn new(catalog: Arc<Catalog>, airborne_only: bool) -> Self {
        Self {
            catalog,
            airborne_only,
        }
    }

    pub fn normalize(
        &self,
        state: &[Value],
        response_time: i64,
    ) -> Result<FlightRecord, Rejection> {
        let position = match (float_at(state, IDX_LATITUDE), float_at(state, IDX_LONGITUDE)) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => return Err(Rejection::MissingPosition),
        };
        if !position.is_valid() {
            return Err(Rejection::MissingPosition);
        }

        if self.airborne_only && bool_at(state, IDX_ON_GROUND) == Some(true) {
            return Err(Rejection::OnGround);
        }

        let icao24 = str_at(state, IDX_ICAO24).map(str::to_ascii_lowercase);
        let code = match str_at(state, IDX_CALLSIGN) {
            Some(callsign) => callsign.to_string(),
            None => icao24
                .as_deref()
                .map(str::to_ascii_uppercase)
                .ok_or(Rejection::MissingIdentity)?,
        };

        let altitude_m = float_at(state, IDX_BARO_ALTITUDE)
            .or_else(|| float_at(state, IDX_GEO_ALTITUDE))
            .unwrap_or(0.0);

        Ok(FlightRecord {
            airline: self.catalog.airline_name(&code),
            code,
            icao24,
            position,
            altitude_ft: meters_to_feet(altitude_m),
            speed_kts: ms_to_knots(float_at(state, IDX_VELOCITY).unwrap_or(0.0)),
            heading_deg: normalize_heading(float_at(state, IDX_TRUE_TRACK).unwrap_or(0.0)),
            country: str_at(state, IDX_ORIGIN_COUNTRY)
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            departure: NOT_AVAILABLE.to_string(),
            arrival: NOT_AVAILABLE.to_string(),
            last_update: int_at(state, IDX_LAST_CONTACT).unwrap_or(response_time),
            provenance: Provenance::Live,
        })
    }

    pub fn normalize_all(&self, states: &[Vec<Value>], response_time: i64) -> Normalized {
        let mut out = Normalized::default();
        for state in states {
            match self.normalize(state, response_time) {
                Ok(flight) => out.flights.push(flight),
                Err(reason) => *out.rejected.entry(reason).or_default() += 1,
            }
        }
        out
    }
}

fn float_at(state: &[Value], idx: usize) -> Option<f64> {
    state.get(idx)?.as_f64().filter(|v| v.is_finite())
}

fn int_at(state: &[Value], idx: usize) -> Option<i64> {
    let value = state.get(idx)?;
    value.as_i64().or_else(|| value.as_f64().map(|v| v as i64))
}

fn bool_at(state: &[Value], idx: usize) -> Option<bool> {
    state.get(idx)?.as_bool()
}

/// Non-blank, trimmed string field.
fn str_at(state: &[Value], idx: usize) -> Option<&str> {
    state
        .get(idx)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer(airborne_only: bool) -> Normalizer {
        Normalizer::new(Arc::new(Catalog::load(None).unwrap()), airborne_only)
    }

    fn state(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap()
    }

    fn air_india() -> Vec<Value> {
        state(json!([
            "800c4d", "AI101   ", "India", 1700000000, 1700000005,
            77.1, 28.6, 10668.0, false, 231.5, 92.3, 0.0, null, 10700.0, "1234", false, 0
        ]))
    }

    #[test]
    fn test_full_state_vector() {
        let flight = normalizer(true).normalize(&air_india(), 1).unwrap();
        assert_eq!(flight.code, "AI101");
        assert_eq!(flight.icao24.as_deref(), Some("800c4d"));
        assert_eq!(flight.airline, "Air India");
        assert_eq!(flight.country, "India");
        assert_eq!(flight.position, GeoPoint::new(28.6, 77.1));
        assert_eq!(flight.altitude_ft, (10668.0_f64 * 3.28084).round() as u32);
        assert_eq!(flight.speed_kts, (231.5_f64 * 1.94384).round() as u32);
        assert_eq!(flight.heading_deg, 92.3);
        assert_eq!(flight.departure, "N/A");
        assert_eq!(flight.arrival, "N/A");
        assert_eq!(flight.last_update, 1700000005);
        assert_eq!(flight.provenance, Provenance::Live);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(meters_to_feet(1000.0), 3281);
        assert_eq!(meters_to_feet(0.0), 0);
        assert_eq!(meters_to_feet(-30.0), 0);
        assert_eq!(ms_to_knots(100.0), 194);
        assert_eq!(ms_to_knots(250.0), 486);
        for m in [1.0, 152.4, 3048.0, 12496.8] {
            assert_eq!(meters_to_feet(m), (m * 3.28084).round() as u32);
        }
    }

    #[test]
    fn test_missing_position_rejected() {
        let n = normalizer(true);
        let mut s = air_india();
        s[IDX_LATITUDE] = Value::Null;
        assert_eq!(n.normalize(&s, 0), Err(Rejection::MissingPosition));

        let mut s = air_india();
        s[IDX_LONGITUDE] = json!("77.1");
        assert_eq!(n.normalize(&s, 0), Err(Rejection::MissingPosition));

        let short = state(json!(["800c4d", "AI101"]));
        assert_eq!(n.normalize(&short, 0), Err(Rejection::MissingPosition));

        let mut s = air_india();
        s[IDX_LATITUDE] = json!(95.0);
        assert_eq!(n.normalize(&s, 0), Err(Rejection::MissingPosition));
    }

    #[test]
    fn test_zero_coordinates_are_a_position() {
        let mut s = air_india();
        s[IDX_LATITUDE] = json!(0.0);
        s[IDX_LONGITUDE] = json!(0.0);
        assert!(normalizer(true).normalize(&s, 0).is_ok());
    }

    #[test]
    fn test_on_ground_filter() {
        let mut s = air_india();
        s[IDX_ON_GROUND] = json!(true);
        assert_eq!(normalizer(true).normalize(&s, 0), Err(Rejection::OnGround));
        assert!(normalizer(false).normalize(&s, 0).is_ok());

        // unknown ground status is not filtered
        s[IDX_ON_GROUND] = Value::Null;
        assert!(normalizer(true).normalize(&s, 0).is_ok());
    }

    #[test]
    fn test_optional_fields_default() {
        let s = state(json!([null, "ZZ1", null, null, null, 10.0, 20.0]));
        let flight = normalizer(true).normalize(&s, 1700000000).unwrap();
        assert_eq!(flight.airline, "ZZ1");
        assert_eq!(flight.country, "Unknown");
        assert_eq!(flight.icao24, None);
        assert_eq!(flight.altitude_ft, 0);
        assert_eq!(flight.speed_kts, 0);
        assert_eq!(flight.heading_deg, 0.0);
        assert_eq!(flight.last_update, 1700000000);
    }

    #[test]
    fn test_geo_altitude_fallback() {
        let mut s = air_india();
        s[IDX_BARO_ALTITUDE] = Value::Null;
        let flight = normalizer(true).normalize(&s, 0).unwrap();
        assert_eq!(flight.altitude_ft, meters_to_feet(10700.0));
    }

    #[test]
    fn test_blank_callsign_falls_back_to_icao24() {
        let mut s = air_india();
        s[IDX_CALLSIGN] = json!("        ");
        let flight = normalizer(true).normalize(&s, 0).unwrap();
        assert_eq!(flight.code, "800C4D");

        s[IDX_ICAO24] = Value::Null;
        assert_eq!(
            normalizer(true).normalize(&s, 0),
            Err(Rejection::MissingIdentity)
        );
    }

    #[test]
    fn test_negative_track_is_folded() {
        let mut s = air_india();
        s[IDX_TRUE_TRACK] = json!(-10.0);
        let flight = normalizer(true).normalize(&s, 0).unwrap();
        assert_eq!(flight.heading_deg, 350.0);
    }

    #[test]
    fn test_normalize_all_tallies_rejections() {
        let mut no_pos = air_india();
        no_pos[IDX_LATITUDE] = Value::Null;
        let mut grounded = air_india();
        grounded[IDX_ON_GROUND] = json!(true);

        let states = vec![air_india(), no_pos.clone(), no_pos, grounded];
        let out = normalizer(true).normalize_all(&states, 0);

        assert_eq!(out.flights.len(), 1);
        assert_eq!(out.rejected.get(&Rejection::MissingPosition), Some(&2));
        assert_eq!(out.rejected.get(&Rejection::OnGround), Some(&1));
        assert_eq!(out.rejected_total(), 3);
    }
}
