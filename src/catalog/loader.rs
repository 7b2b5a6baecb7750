use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::error::CatalogError;
use crate::catalog::types::{Airport, MockRoute};
use crate::geo::GeoPoint;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    carriers: HashMap<String, String>,
    #[serde(default)]
    airports: BTreeMap<String, AirportEntry>,
    #[serde(default)]
    mock_airlines: Vec<MockAirlineEntry>,
}

#[derive(Debug, Deserialize)]
struct AirportEntry {
    name: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct MockAirlineEntry {
    code: String,
    name: String,
    routes: Vec<String>,
}

#[derive(Debug)]
pub struct Catalog {
    carriers: HashMap<String, String>,
    airports: BTreeMap<String, Airport>,
    routes: Vec<MockRoute>,
}

impl Catalog {
    /// Load the catalog from `path`, or the embedded table when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let catalog = Self::from_yaml(&content)?;
                log::info!(
                    "Loaded catalog from {} ({} carriers, {} airports, {} mock routes)",
                    path.display(),
                    catalog.carriers.len(),
                    catalog.airports.len(),
                    catalog.routes.len()
                );
                Ok(catalog)
            }
            None => Self::from_yaml(BUILTIN_CATALOG),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;

        let mut airports = BTreeMap::new();
        for (code, entry) in file.airports {
            let location = GeoPoint::new(entry.lat, entry.lon);
            if !location.is_valid() {
                return Err(CatalogError::InvalidAirport(code));
            }
            airports.insert(
                code.clone(),
                Airport {
                    code,
                    name: entry.name,
                    location,
                },
            );
        }

        let mut routes = Vec::new();
        for airline in &file.mock_airlines {
            for route in &airline.routes {
                let (from, to) = route
                    .split_once('-')
                    .map(|(a, b)| (a.trim(), b.trim()))
                    .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                    .ok_or_else(|| CatalogError::InvalidRoute(route.clone()))?;

                let lookup = |code: &str| {
                    airports
                        .get(code)
                        .cloned()
                        .ok_or_else(|| CatalogError::UnknownAirport {
                            airline: airline.code.clone(),
                            route: route.clone(),
                            airport: code.to_string(),
                        })
                };

                routes.push(MockRoute {
                    airline_code: airline.code.clone(),
                    airline_name: airline.name.clone(),
                    from: lookup(from)?,
                    to: lookup(to)?,
                });
            }
        }

        Ok(Catalog {
            carriers: file.carriers,
            airports,
            routes,
        })
    }

    /// Human airline name for a flight code: the 3-character prefix is tried
    /// first, then the 2-character prefix, then the code itself is returned.
    pub fn airline_name(&self, flight_code: &str) -> String {
        [3, 2]
            .iter()
            .filter_map(|&len| flight_code.get(..len))
            .find_map(|prefix| self.carriers.get(prefix))
            .cloned()
            .unwrap_or_else(|| flight_code.to_string())
    }

    pub fn routes(&self) -> &[MockRoute] {
        &self.routes
    }

    pub fn carrier_count(&self) -> usize {
        self.carriers.len()
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }
}
