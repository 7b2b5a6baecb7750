use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::markers::group_thousands;
use crate::config::DisplayConfig;
use crate::flights::{AltitudeBand, FlightRecord};
use crate::geo::GeoPoint;

pub const NO_FLIGHTS_MESSAGE: &str =
    "No flights available. Please check your internet connection or try again later.";
pub const NO_MATCHES_MESSAGE: &str = "No flights match your search";

/// Per-request filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    /// Empty means every band.
    pub bands: BTreeSet<AltitudeBand>,
}

impl ListQuery {
    pub fn new(search: Option<String>, bands: BTreeSet<AltitudeBand>) -> Self {
        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        Self { search, bands }
    }
}

/// Configured, request-independent list settings.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub region: String,
    pub limit: usize,
    pub carriers: Vec<String>,
    pub airports: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for ListOptions {
    fn from(display: &DisplayConfig) -> Self {
        Self {
            region: display.region.clone(),
            limit: display.list_limit,
            carriers: display.carriers.iter().map(|c| c.to_uppercase()).collect(),
            airports: display.airports.iter().map(|a| a.to_uppercase()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ListEntry {
    pub code: String,
    pub airline: String,
    pub country: String,
    pub departure: String,
    pub arrival: String,
    pub altitude_ft: u32,
    pub altitude: String,
    pub speed_kts: u32,
    pub band: AltitudeBand,
    pub color: String,
    pub position: GeoPoint,
    pub regional: bool,
}

impl ListEntry {
    fn new(flight: &FlightRecord, regional: bool) -> Self {
        let band = flight.band();
        Self {
            code: flight.code.clone(),
            airline: flight.airline.clone(),
            country: flight.country.clone(),
            departure: flight.departure.clone(),
            arrival: flight.arrival.clone(),
            altitude_ft: flight.altitude_ft,
            altitude: format!("{} ft", group_thousands(flight.altitude_ft)),
            speed_kts: flight.speed_kts,
            band,
            color: band.color().to_string(),
            position: flight.position,
            regional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Entries,
    NoFlights,
    NoMatches,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ListView {
    pub status: ListStatus,
    pub entries: Vec<ListEntry>,
    /// Records passing every filter, before the limit is applied.
    pub matched: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl ListView {
    fn placeholder(status: ListStatus, total: usize) -> Self {
        let message = match status {
            ListStatus::NoFlights => NO_FLIGHTS_MESSAGE,
            _ => NO_MATCHES_MESSAGE,
        };
        Self {
            status,
            entries: Vec::new(),
            matched: 0,
            total,
            placeholder: Some(message.to_string()),
        }
    }
}

/// Regional flights first (stable), then search, band and allow-list
/// filters, then the limit.
pub fn build_list(
    flights: &[FlightRecord],
    query: &ListQuery,
    options: &ListOptions,
) -> ListView {
    if flights.is_empty() {
        return ListView::placeholder(ListStatus::NoFlights, 0);
    }

    let mut ordered: Vec<(&FlightRecord, bool)> = flights
        .iter()
        .map(|f| (f, f.is_regional(&options.region)))
        .collect();
    // sort_by_key is stable, so provider order survives inside each group
    ordered.sort_by_key(|(_, regional)| !*regional);

    let matching: Vec<ListEntry> = ordered
        .into_iter()
        .filter(|(f, _)| matches_search(f, query.search.as_deref()))
        .filter(|(f, _)| query.bands.is_empty() || query.bands.contains(&f.band()))
        .filter(|(f, _)| allowed(f, options))
        .map(|(f, regional)| ListEntry::new(f, regional))
        .collect();

    if matching.is_empty() {
        return ListView::placeholder(ListStatus::NoMatches, flights.len());
    }

    let matched = matching.len();
    let entries = matching.into_iter().take(options.limit).collect();

    ListView {
        status: ListStatus::Entries,
        entries,
        matched,
        total: flights.len(),
        placeholder: None,
    }
}

/// `needle` must already be lower-cased.
fn matches_search(flight: &FlightRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    [
        &flight.code,
        &flight.country,
        &flight.departure,
        &flight.arrival,
        &flight.airline,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn allowed(flight: &FlightRecord, options: &ListOptions) -> bool {
    let carrier_ok = options.carriers.is_empty()
        || options
            .carriers
            .iter()
            .any(|c| flight.code.to_uppercase().starts_with(c.as_str()));
    let airport_ok = options.airports.is_empty()
        || options.airports.iter().any(|a| {
            airport_code(&flight.departure) == *a || airport_code(&flight.arrival) == *a
        });
    carrier_ok && airport_ok
}

/// `"DEL (Indira Gandhi ...)"` → `"DEL"`.
fn airport_code(label: &str) -> String {
    label
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flights::Provenance;

    fn flight(code: &str, country: &str, altitude_ft: u32) -> FlightRecord {
        FlightRecord {
            code: code.to_string(),
            icao24: None,
            position: GeoPoint::new(20.0, 78.0),
            altitude_ft,
            speed_kts: 420,
            heading_deg: 0.0,
            airline: "Unknown".to_string(),
            country: country.to_string(),
            departure: "N/A".to_string(),
            arrival: "N/A".to_string(),
            last_update: 0,
            provenance: Provenance::Live,
        }
    }

    fn codes(view: &ListView) -> Vec<&str> {
        view.entries.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn test_empty_input_placeholder() {
        let view = build_list(&[], &ListQuery::default(), &ListOptions::default());
        assert_eq!(view.status, ListStatus::NoFlights);
        assert_eq!(view.placeholder.as_deref(), Some(NO_FLIGHTS_MESSAGE));
    }

    #[test]
    fn test_regional_first_and_stable() {
        let flights = vec![
            flight("DLH1", "Germany", 0),
            flight("AI1", "India", 0),
            flight("BAW1", "United Kingdom", 0),
            flight("AI2", "india", 0),
        ];
        let view = build_list(&flights, &ListQuery::default(), &ListOptions::default());
        assert_eq!(codes(&view), vec!["AI1", "AI2", "DLH1", "BAW1"]);
        assert!(view.entries[0].regional);
        assert!(!view.entries[2].regional);
        assert_eq!(view.placeholder, None);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut with_route = flight("UK955", "India", 0);
        with_route.departure = "BOM (Chhatrapati Shivaji Maharaj)".to_string();
        let flights = vec![flight("DLH1", "Germany", 0), with_route, flight("AFR2", "France", 0)];

        let by_country = ListQuery::new(Some("GERM".to_string()), BTreeSet::new());
        assert_eq!(
            codes(&build_list(&flights, &by_country, &ListOptions::default())),
            vec!["DLH1"]
        );

        let by_route = ListQuery::new(Some("  shivaji ".to_string()), BTreeSet::new());
        assert_eq!(
            codes(&build_list(&flights, &by_route, &ListOptions::default())),
            vec!["UK955"]
        );

        let none = ListQuery::new(Some("zzz".to_string()), BTreeSet::new());
        let view = build_list(&flights, &none, &ListOptions::default());
        assert_eq!(view.status, ListStatus::NoMatches);
        assert_eq!(view.placeholder.as_deref(), Some(NO_MATCHES_MESSAGE));
        assert_eq!(view.total, 3);
    }

    #[test]
    fn test_band_filter() {
        let flights = vec![
            flight("A", "France", 36_000),
            flight("B", "France", 500),
            flight("C", "France", 25_000),
        ];
        let query = ListQuery::new(None, AltitudeBand::parse_set("high,low").unwrap());
        assert_eq!(
            codes(&build_list(&flights, &query, &ListOptions::default())),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_limit_caps_entries() {
        let flights: Vec<_> = (0..150).map(|i| flight(&format!("F{i}"), "Spain", 0)).collect();
        let view = build_list(&flights, &ListQuery::default(), &ListOptions::default());
        assert_eq!(view.entries.len(), 100);
        assert_eq!(view.matched, 150);
        assert_eq!(view.entries[99].code, "F99");
    }

    #[test]
    fn test_allow_lists() {
        let mut mock = flight("AI512", "India", 0);
        mock.departure = "DEL (Indira Gandhi International Airport)".to_string();
        mock.arrival = "BOM (Chhatrapati Shivaji Maharaj International Airport)".to_string();
        let flights = vec![mock, flight("UK1", "India", 0), flight("ai2", "India", 0)];

        let options = ListOptions {
            carriers: vec!["AI".to_string()],
            ..ListOptions::default()
        };
        assert_eq!(
            codes(&build_list(&flights, &ListQuery::default(), &options)),
            vec!["AI512", "ai2"]
        );

        let display = DisplayConfig {
            airports: vec!["bom".to_string()],
            ..DisplayConfig::default()
        };
        let options = ListOptions::from(&display);
        assert_eq!(
            codes(&build_list(&flights, &ListQuery::default(), &options)),
            vec!["AI512"]
        );
    }
}
