use chrono::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::flights::{AltitudeBand, FlightRecord};
use crate::geo::GeoPoint;

/// Zoom level used when centering on a single flight.
pub const FOCUS_ZOOM: u8 = 8;

/// The map collaborator. Only markers and the view are touched; tiles and
/// rendering belong to whoever implements this.
pub trait MapSurface {
    type Handle;

    fn add_marker(&mut self, spec: &MarkerSpec) -> Self::Handle;
    fn remove_marker(&mut self, handle: Self::Handle);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MarkerSpec {
    pub code: String,
    pub position: GeoPoint,
    /// Icon rotation, degrees clockwise from north.
    pub rotation_deg: f64,
    pub band: AltitudeBand,
    pub color: String,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Popup {
    pub title: String,
    pub airline: String,
    pub from: String,
    pub to: String,
    pub altitude: String,
    pub speed: String,
    pub heading: String,
    pub updated: String,
}

impl MarkerSpec {
    pub fn from_flight(flight: &FlightRecord) -> Self {
        let band = flight.band();
        Self {
            code: flight.code.clone(),
            position: flight.position,
            rotation_deg: flight.heading_deg,
            band,
            color: band.color().to_string(),
            popup: Popup {
                title: flight.code.clone(),
                airline: flight.airline.clone(),
                from: flight.departure.clone(),
                to: flight.arrival.clone(),
                altitude: format!("{} ft", group_thousands(flight.altitude_ft)),
                speed: format!("{} kts", flight.speed_kts),
                heading: format!("{}°", flight.heading_deg.round() as u32 % 360),
                updated: clock_time(flight.last_update),
            },
        }
    }
}

/// `35000` → `35,000`.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn clock_time(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

struct Placed<H> {
    code: String,
    position: GeoPoint,
    handle: H,
}

/// Tracks the markers it has put on a surface so the next sync can take them
/// all down again.
pub struct MarkerLayer<H> {
    placed: Vec<Placed<H>>,
}

impl<H> Default for MarkerLayer<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> MarkerLayer<H> {
    pub fn new() -> Self {
        Self { placed: Vec::new() }
    }

    /// Full replace: every previously placed marker is removed before the new
    /// set is added. Returns the number of markers placed.
    pub fn sync<M>(&mut self, surface: &mut M, flights: &[FlightRecord]) -> usize
    where
        M: MapSurface<Handle = H>,
    {
        for placed in self.placed.drain(..) {
            surface.remove_marker(placed.handle);
        }

        for flight in flights {
            let spec = MarkerSpec::from_flight(flight);
            let handle = surface.add_marker(&spec);
            self.placed.push(Placed {
                code: spec.code,
                position: spec.position,
                handle,
            });
        }

        self.placed.len()
    }

    /// Center the surface on the first marker whose code matches. Unknown
    /// codes leave the view alone.
    pub fn focus<M>(&self, surface: &mut M, code: &str) -> Option<GeoPoint>
    where
        M: MapSurface<Handle = H>,
    {
        let code = code.trim();
        let placed = self
            .placed
            .iter()
            .find(|p| p.code.eq_ignore_ascii_case(code))?;
        surface.set_view(placed.position, FOCUS_ZOOM);
        Some(placed.position)
    }
}
