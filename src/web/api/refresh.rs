use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::flights::Provenance;
use crate::refresh::{Fallback, FlightSnapshot, RefreshCounters, RefreshOutcome, RefreshState};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotSummary {
    pub source: Provenance,
    pub completed_at: DateTime<Utc>,
    pub flight_count: usize,
    pub fallback: Option<Fallback>,
    pub notice: Option<String>,
}

impl From<&FlightSnapshot> for SnapshotSummary {
    fn from(snapshot: &FlightSnapshot) -> Self {
        SnapshotSummary {
            source: snapshot.source,
            completed_at: snapshot.completed_at,
            flight_count: snapshot.flights.len(),
            fallback: snapshot.fallback.clone(),
            notice: snapshot.notice(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TriggerResult {
    Completed,
    Skipped,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub result: TriggerResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub provider: String,
    pub refresh: RefreshState,
    pub counters: RefreshCounters,
    pub snapshot: Option<SnapshotSummary>,
    pub markers: usize,
}

#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "Refresh ran or was skipped", body = RefreshResponse)
    ),
    tag = "refresh"
)]
pub async fn trigger_refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let response = match state.refresher.refresh().await {
        RefreshOutcome::Completed(snapshot) => RefreshResponse {
            result: TriggerResult::Completed,
            snapshot: Some(SnapshotSummary::from(snapshot.as_ref())),
        },
        RefreshOutcome::Skipped => RefreshResponse {
            result: TriggerResult::Skipped,
            snapshot: None,
        },
    };
    Json(response)
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Refresh state and snapshot", body = StatusResponse)
    ),
    tag = "refresh"
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let markers = state.presenter.lock().await.board().len();
    Json(StatusResponse {
        provider: state.refresher.source_description(),
        refresh: state.refresher.state(),
        counters: state.refresher.counters(),
        snapshot: state
            .refresher
            .latest()
            .map(|s| SnapshotSummary::from(s.as_ref())),
        markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FailureKind;
    use crate::web::state::simulated_state;

    #[tokio::test]
    async fn test_trigger_with_simulated_provider() {
        let state = simulated_state();
        let Json(response) = trigger_refresh(State(state.clone())).await;

        assert_eq!(response.result, TriggerResult::Completed);
        let summary = response.snapshot.unwrap();
        assert_eq!(summary.source, Provenance::Synthetic);
        assert_eq!(summary.fallback.unwrap().kind, FailureKind::Disabled);
        assert!(summary.notice.unwrap().starts_with("Using simulated data"));
        assert!(summary.flight_count > 0);
    }

    #[tokio::test]
    async fn test_status() {
        let state = simulated_state();
        let Json(before) = status(State(state.clone())).await;
        assert_eq!(before.provider, "simulated");
        assert_eq!(before.refresh, RefreshState::Idle);
        assert!(before.snapshot.is_none());

        trigger_refresh(State(state.clone())).await;
        let Json(after) = status(State(state)).await;
        assert_eq!(after.counters.completed, 1);
        assert_eq!(after.counters.fallbacks, 1);
        assert_eq!(after.snapshot.unwrap().source, Provenance::Synthetic);

        let json = serde_json::to_value(&after.refresh).unwrap();
        assert_eq!(json["state"], "idle");
    }
}
