use std::ops::Range;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::catalog::Catalog;
use crate::flights::types::{FlightRecord, Provenance};

const ALTITUDE_RANGE_FT: Range<u32> = 25_000..40_000;
const SPEED_RANGE_KTS: Range<u32> = 400..500;
const FLIGHT_NUMBER_RANGE: Range<u32> = 100..1000;

/// Synthetic traffic along the catalog's mock routes, one flight per route.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    catalog: Arc<Catalog>,
    region: String,
}

impl MockGenerator {
    pub fn new(catalog: Arc<Catalog>, region: impl Into<String>) -> Self {
        Self {
            catalog,
            region: region.into(),
        }
    }

    pub fn generate(&self) -> Vec<FlightRecord> {
        self.generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Vec<FlightRecord> {
        let now = Utc::now().timestamp();

        self.catalog
            .routes()
            .iter()
            .map(|route| {
                let progress: f64 = rng.random();
                let position = route.from.location.lerp(route.to.location, progress);
                let code = format!(
                    "{}{}",
                    route.airline_code,
                    rng.random_range(FLIGHT_NUMBER_RANGE)
                );

                FlightRecord {
                    icao24: Some(code.clone()),
                    code,
                    position,
                    altitude_ft: rng.random_range(ALTITUDE_RANGE_FT),
                    speed_kts: rng.random_range(SPEED_RANGE_KTS),
                    heading_deg: route.from.location.bearing_to(route.to.location),
                    airline: route.airline_name.clone(),
                    country: self.region.clone(),
                    departure: route.from.label(),
                    arrival: route.to.label(),
                    last_update: now,
                    provenance: Provenance::Synthetic,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> MockGenerator {
        MockGenerator::new(Arc::new(Catalog::load(None).unwrap()), "India")
    }

    #[test]
    fn test_one_flight_per_route() {
        let g = generator();
        let flights = g.generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(flights.len(), g.catalog.routes().len());
        assert!(flights.iter().all(|f| f.provenance == Provenance::Synthetic));
    }

    #[test]
    fn test_values_within_plausible_ranges() {
        let flights = generator().generate_with(&mut StdRng::seed_from_u64(42));
        for f in &flights {
            assert!(ALTITUDE_RANGE_FT.contains(&f.altitude_ft), "{f:?}");
            assert!(SPEED_RANGE_KTS.contains(&f.speed_kts), "{f:?}");
            assert!((0.0..360.0).contains(&f.heading_deg), "{f:?}");
            assert!(f.position.is_valid());
            assert_eq!(f.country, "India");
            let number: u32 = f.code[f.code.len() - 3..].parse().unwrap();
            assert!(FLIGHT_NUMBER_RANGE.contains(&number));
        }
    }

    #[test]
    fn test_positions_lie_between_endpoints() {
        let g = generator();
        let flights = g.generate_with(&mut StdRng::seed_from_u64(3));
        for (flight, route) in flights.iter().zip(g.catalog.routes()) {
            let (lo_lat, hi_lat) = ordered(route.from.location.lat, route.to.location.lat);
            let (lo_lon, hi_lon) = ordered(route.from.location.lon, route.to.location.lon);
            assert!((lo_lat..=hi_lat).contains(&flight.position.lat));
            assert!((lo_lon..=hi_lon).contains(&flight.position.lon));
            assert!(flight.code.starts_with(&route.airline_code));
            assert_eq!(flight.departure, route.from.label());
            assert_eq!(flight.arrival, route.to.label());
        }
    }

    #[test]
    fn test_heading_uses_great_circle_bearing() {
        let g = generator();
        let flights = g.generate_with(&mut StdRng::seed_from_u64(1));
        let route = &g.catalog.routes()[0];
        let expected = crate::geo::initial_bearing(route.from.location, route.to.location);
        assert_eq!(flights[0].heading_deg, expected);
    }

    fn ordered(a: f64, b: f64) -> (f64, f64) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}
