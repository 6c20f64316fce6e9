//! Router configuration for the API.
//!
//! All routes register through [`OpenApiRouter`] so the generated document
//! served at `/api-docs/openapi.json` matches what is mounted.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{audit_logs, health, orders, prefixes};
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::state::AppState;

pub const SWAGGER_PATH: &str = "/swagger-ui";
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Creates the application router with all routes and middleware.
///
/// Requests running longer than `request_timeout` are answered with an
/// enveloped 408.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api/prefixes", prefixes::prefix_routes())
        .nest("/api/orders", orders::order_routes())
        .nest("/api/members", orders::member_order_routes())
        .nest("/api/audit-logs", audit_logs::audit_log_routes())
        .merge(health::health_routes())
        .split_for_parts();

    let router = router.merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, api));
    with_middleware(router, request_timeout).with_state(state)
}

/// # Middleware Order
/// Last added runs first:
/// 1. request id is assigned or propagated
/// 2. the request is logged inside an `http_request` span
/// 3. bare error responses are wrapped in the envelope
/// 4. the handler is cut off after `request_timeout`
fn with_middleware(router: Router<AppState>, request_timeout: Duration) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE]);

    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(cors)
}
