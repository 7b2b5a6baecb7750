use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::web::api::error::ApiResult;
use crate::web::api::flights::{current_list, FlightsQuery};
use crate::web::state::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<FlightsQuery>,
) -> ApiResult<DashboardTemplate> {
    let list_query = query.to_list_query()?;
    let view = current_list(&state, &list_query);
    let latest = state.refresher.latest();
    let markers = state.presenter.lock().await.board().len();

    Ok(DashboardTemplate {
        notice: latest.as_ref().and_then(|s| s.notice()),
        source: latest
            .as_ref()
            .map(|s| s.source.to_string())
            .unwrap_or_else(|| "pending".to_string()),
        updated: latest
            .as_ref()
            .map(|s| s.completed_at.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string()),
        search: query.search.unwrap_or_default(),
        bands: query.bands.unwrap_or_default(),
        markers,
        view,
    })
}

#[derive(Debug, Deserialize)]
pub struct FocusForm {
    pub code: String,
}

/// Focus button on the dashboard. Unknown codes leave the view as it was.
pub async fn focus_and_return(
    State(state): State<AppState>,
    Form(form): Form<FocusForm>,
) -> Redirect {
    if state.presenter.lock().await.focus(&form.code).is_none() {
        log::debug!("No marker to focus for {:?}", form.code);
    }
    Redirect::to("/")
}
