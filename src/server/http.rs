use crate::app::dto::*;
use crate::app::service::LensService;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[derive(Clone)]
pub struct HttpState {
    pub service: LensService,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

pub fn build_router(service: LensService) -> Router {
    let state = Arc::new(HttpState { service });

    Router::new()
        .route("/health", get(health))
        .route("/scan", post(scan))
        .route("/launch-plan", post(launch_plan))
        .route("/reload", post(reload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(service: LensService, addr: SocketAddr) -> Result<()> {
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.service.health())
}

async fn reload(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let service = state.service.clone();
    match spawn_blocking(move || service.reload_config()).await {
        Ok(Ok(res)) => Json(res).into_response(),
        Ok(Err(e)) => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")).into_response()
        }
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("task join error: {e}"),
        )
        .into_response(),
    }
}

async fn scan(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<ScanRequest>,
) -> impl IntoResponse {
    match state.service.scan(req).await {
        Ok(res) => Json(res).into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, format!("{e:#}")).into_response(),
    }
}

async fn launch_plan(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<LaunchPlanRequest>,
) -> impl IntoResponse {
    match state.service.plan_launch(req).await {
        Ok(plan) => Json(LaunchPlanResponse::from(plan)).into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, format!("{e:#}")).into_response(),
    }
}
