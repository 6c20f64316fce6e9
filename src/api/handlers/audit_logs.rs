use axum::extract::State;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUDIT_LOG_TAG;
use crate::api::dto::AuditLogResponse;
use crate::api::middleware::ErrorDetail;
use crate::api::response::ApiResponse;
use crate::error::AppResult;
use crate::query::PagingRequest;
use crate::state::AppState;
use crate::utils::QueryParams;

pub fn audit_log_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_audit_logs))
}

/// GET /api/audit-logs - Paginated audit trail
///
/// `date` (unix seconds) restricts results to that UTC day.
#[utoipa::path(
    get,
    path = "/",
    tag = AUDIT_LOG_TAG,
    params(PagingRequest),
    responses(
        (status = 200, description = "One page of audit rows", body = ApiResponse<Vec<AuditLogResponse>>),
        (status = 400, description = "Invalid search or sort parameters", body = ApiResponse<ErrorDetail>)
    )
)]
async fn list_audit_logs(
    State(state): State<AppState>,
    QueryParams(req): QueryParams<PagingRequest>,
) -> AppResult<ApiResponse<Vec<AuditLogResponse>>> {
    let (logs, page) = state
        .services
        .audit_logs
        .list(&state.query_context(), &req)
        .await?;
    let data = logs.into_iter().map(AuditLogResponse::from).collect();
    Ok(ApiResponse::paginate(data, page))
}
