use crate::infra::{AppState, PermitService, PermitStatusView};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use permesso::error::AppError;
use permesso::workflows::permit::PermitCode;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn ops_router(service: Arc<PermitService>) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/permits/:code/status", get(permit_status_endpoint))
        .with_state(service)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Same pipeline as a chat message, minus the rendering: a code that fails the
/// shape check is a 422 and never reaches the portal.
pub(crate) async fn permit_status_endpoint(
    State(service): State<Arc<PermitService>>,
    Path(code): Path<String>,
) -> Result<Json<PermitStatusView>, AppError> {
    let code = PermitCode::parse(&code)?;
    let verdict = service.lookup(&code).await;
    Ok(Json(PermitStatusView::new(&code, verdict)))
}
