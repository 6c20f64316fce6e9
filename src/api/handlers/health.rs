//! Health check endpoint handlers.
//!
//! `/health/live` never touches dependencies. `/health` and `/health/ready`
//! round-trip a query through the pool.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::api::response::ApiResponse;
use crate::state::AppState;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Full health report including database connectivity.
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Service is unhealthy", body = ApiResponse<HealthResponse>)
    )
)]
async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);

    let report = HealthResponse::from_checks(crate::pkg_version(), checks);
    match report.status {
        HealthStatus::Healthy => ApiResponse::ok(report),
        HealthStatus::Unhealthy => {
            ApiResponse::error(StatusCode::SERVICE_UNAVAILABLE, "unhealthy", report)
        }
    }
}

/// Readiness probe: 200 once the database answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    )
)]
async fn readiness_check(State(state): State<AppState>) -> ApiResponse<()> {
    match check_database(&state).await.status {
        HealthStatus::Healthy => ApiResponse::message(StatusCode::OK, "ready"),
        HealthStatus::Unhealthy => {
            ApiResponse::message(StatusCode::SERVICE_UNAVAILABLE, "not ready")
        }
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Service is alive"))
)]
async fn liveness_check() -> ApiResponse<()> {
    ApiResponse::message(StatusCode::OK, "alive")
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let started = Instant::now();
    let result = state.query_context().run(state.store.ping()).await;
    let response_time_ms = Some(started.elapsed().as_millis() as u64);

    match result {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Connected".to_string()),
            response_time_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                response_time_ms,
            }
        }
    }
}
