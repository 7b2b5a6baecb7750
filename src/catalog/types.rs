use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub code: String,
    pub name: String,
    pub location: GeoPoint,
}

impl Airport {
    /// Label shown for departures and arrivals, e.g. `DEL (Indira Gandhi ...)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.code, self.name)
    }
}

/// One synthetic flight lane: an airline flying between two catalog airports.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRoute {
    pub airline_code: String,
    pub airline_name: String,
    pub from: Airport,
    pub to: Airport,
}
