use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::flights::{AltitudeBand, FlightRecord};
use crate::presentation::{build_list, BoardState, ListQuery, ListView, MapView};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlightsQuery {
    /// Case-insensitive substring over code, country, airline and route.
    pub search: Option<String>,
    /// Comma separated altitude bands, e.g. `high,low`.
    pub bands: Option<String>,
}

impl FlightsQuery {
    pub fn to_list_query(&self) -> ApiResult<ListQuery> {
        let bands = AltitudeBand::parse_set(self.bands.as_deref().unwrap_or_default())
            .map_err(ApiError::Validation)?;
        Ok(ListQuery::new(self.search.clone(), bands))
    }
}

/// List view over the latest snapshot. Before the first refresh completes
/// this is the "no flights" placeholder.
pub fn current_list(state: &AppState, query: &ListQuery) -> ListView {
    match state.refresher.latest() {
        Some(snapshot) => build_list(&snapshot.flights, query, &state.list_options),
        None => build_list(&[], query, &state.list_options),
    }
}

#[utoipa::path(
    get,
    path = "/api/flights",
    params(FlightsQuery),
    responses(
        (status = 200, description = "Sorted and filtered flight list", body = ListView),
        (status = 400, description = "Unknown altitude band", body = ErrorResponse)
    ),
    tag = "flights"
)]
pub async fn list_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightsQuery>,
) -> ApiResult<Json<ListView>> {
    let query = query.to_list_query()?;
    Ok(Json(current_list(&state, &query)))
}

#[utoipa::path(
    get,
    path = "/api/flights/{code}",
    params(("code" = String, Path, description = "Flight code")),
    responses(
        (status = 200, description = "Flight record", body = FlightRecord),
        (status = 404, description = "Not in the current snapshot", body = ErrorResponse)
    ),
    tag = "flights"
)]
pub async fn get_flight(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<FlightRecord>> {
    state
        .refresher
        .latest()
        .and_then(|snapshot| snapshot.find(&code).cloned())
        .map(Json)
        .ok_or(ApiError::FlightNotFound(code))
}

#[utoipa::path(
    post,
    path = "/api/flights/{code}/focus",
    params(("code" = String, Path, description = "Flight code")),
    responses(
        (status = 200, description = "New map view", body = MapView),
        (status = 404, description = "No marker for this flight", body = ErrorResponse)
    ),
    tag = "flights"
)]
pub async fn focus_flight(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<MapView>> {
    let mut presenter = state.presenter.lock().await;
    presenter
        .focus(&code)
        .map(Json)
        .ok_or(ApiError::FlightNotFound(code))
}

#[utoipa::path(
    get,
    path = "/api/markers",
    responses(
        (status = 200, description = "Markers and current view", body = BoardState)
    ),
    tag = "flights"
)]
pub async fn markers(State(state): State<AppState>) -> Json<BoardState> {
    let presenter = state.presenter.lock().await;
    Json(presenter.board().state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::ListStatus;
    use crate::web::state::simulated_state;

    fn query(search: Option<&str>, bands: Option<&str>) -> Query<FlightsQuery> {
        Query(FlightsQuery {
            search: search.map(String::from),
            bands: bands.map(String::from),
        })
    }

    #[tokio::test]
    async fn test_list_before_first_refresh() {
        let state = simulated_state();
        let Json(view) = list_flights(State(state), query(None, None)).await.unwrap();
        assert_eq!(view.status, ListStatus::NoFlights);
    }

    #[tokio::test]
    async fn test_list_after_refresh() {
        let state = simulated_state();
        state.refresher.refresh().await;

        let Json(view) = list_flights(State(state.clone()), query(None, None))
            .await
            .unwrap();
        assert_eq!(view.status, ListStatus::Entries);
        assert_eq!(view.entries.len(), view.total);
        assert!(view.entries.iter().all(|e| e.regional));

        let Json(view) = list_flights(State(state.clone()), query(Some("indigo"), None))
            .await
            .unwrap();
        assert!(!view.entries.is_empty());
        assert!(view.entries.iter().all(|e| e.code.starts_with("6E")));

        let Json(view) = list_flights(State(state), query(Some("no-such-flight"), None))
            .await
            .unwrap();
        assert_eq!(view.status, ListStatus::NoMatches);
    }

    #[tokio::test]
    async fn test_unknown_band_is_rejected() {
        let state = simulated_state();
        let result = list_flights(State(state), query(None, Some("orbit"))).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_and_focus_flight() {
        let state = simulated_state();
        state.refresher.refresh().await;
        let code = state.refresher.latest().unwrap().flights[0].code.clone();

        let Json(flight) = get_flight(State(state.clone()), Path(code.to_lowercase()))
            .await
            .unwrap();
        assert_eq!(flight.code, code);

        // markers exist only once the presenter has applied the snapshot
        assert!(matches!(
            focus_flight(State(state.clone()), Path(code.clone())).await,
            Err(ApiError::FlightNotFound(_))
        ));
        state.presenter.lock().await.apply(&state.refresher.latest().unwrap().flights);

        let Json(view) = focus_flight(State(state.clone()), Path(code)).await.unwrap();
        assert_eq!(view.center, flight.position);

        let Json(board) = markers(State(state)).await;
        assert_eq!(board.view, view);
        assert!(!board.markers.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_flight() {
        let state = simulated_state();
        state.refresher.refresh().await;
        let result = get_flight(State(state), Path("ZZ0000".to_string())).await;
        assert!(matches!(result, Err(ApiError::FlightNotFound(code)) if code == "ZZ0000"));
    }
}
