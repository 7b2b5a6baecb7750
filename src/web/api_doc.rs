use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::flights::FlightsQuery;
use super::api::refresh::{RefreshResponse, SnapshotSummary, StatusResponse, TriggerResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::flights::list_flights,
        super::api::flights::get_flight,
        super::api::flights::focus_flight,
        super::api::flights::markers,
        super::api::refresh::trigger_refresh,
        super::api::refresh::status,
    ),
    components(
        schemas(
            FlightsQuery,
            ErrorResponse,
            RefreshResponse,
            SnapshotSummary,
            StatusResponse,
            TriggerResult,
            crate::flights::FlightRecord,
            crate::flights::AltitudeBand,
            crate::flights::Provenance,
            crate::geo::GeoPoint,
            crate::presentation::ListView,
            crate::presentation::ListEntry,
            crate::presentation::ListStatus,
            crate::presentation::BoardState,
            crate::presentation::BoardMarker,
            crate::presentation::MarkerSpec,
            crate::presentation::Popup,
            crate::presentation::MapView,
            crate::provider::FailureKind,
            crate::refresh::Fallback,
            crate::refresh::RefreshCounters,
            crate::refresh::RefreshState,
        )
    ),
    info(
        title = "Skywatch Flight API",
        description = "Live and simulated aircraft positions, list view and map markers",
        version = "0.1.0"
    ),
    tags(
        (name = "flights", description = "Flight list, records and markers"),
        (name = "refresh", description = "Refresh trigger and status")
    )
)]
pub struct ApiDoc;
