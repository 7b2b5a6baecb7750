use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::presentation::run_presenter;

use super::api::flights as flight_handlers;
use super::api::refresh as refresh_handlers;
use super::api_doc::ApiDoc;
use super::state::{AppState, StateError};
use super::ui::handlers as ui_handlers;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        .route("/focus", post(ui_handlers::focus_and_return))
        // Flight API endpoints
        .route("/api/flights", get(flight_handlers::list_flights))
        .route("/api/flights/{code}", get(flight_handlers::get_flight))
        .route(
            "/api/flights/{code}/focus",
            post(flight_handlers::focus_flight),
        )
        .route("/api/markers", get(flight_handlers::markers))
        // Refresh API endpoints
        .route("/api/refresh", post(refresh_handlers::trigger_refresh))
        .route("/api/status", get(refresh_handlers::status))
        // Static files
        .nest_service("/static", ServeDir::new("src/web/static"))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();
    let interval = config.refresh.interval;
    let state = AppState::from_config(config)?;

    log::info!(
        "Refreshing from {} every {}",
        state.refresher.source_description(),
        humantime::format_duration(interval)
    );

    tokio::spawn(run_presenter(
        Arc::clone(&state.presenter),
        state.refresher.subscribe(),
    ));

    let (stop_tx, stop_rx) = oneshot::channel();
    let refresh_task = tokio::spawn(Arc::clone(&state.refresher).run(interval, stop_rx));

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = stop_tx.send(());
    let _ = refresh_task.await;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
