//! Order request handlers: admin list, member list and info.

use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::ORDER_TAG;
use crate::api::dto::{OrderListQuery, OrderResponse};
use crate::api::middleware::ErrorDetail;
use crate::api::response::ApiResponse;
use crate::error::AppResult;
use crate::query::PagingRequest;
use crate::state::AppState;
use crate::utils::QueryParams;

/// Routes nested under `/api/orders`.
pub fn order_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_orders))
        .routes(routes!(get_order))
}

/// Routes nested under `/api/members`.
pub fn member_order_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_member_orders))
}

/// GET /api/orders - Paginated order list across members
///
/// `start_date` and `end_date` (unix seconds) bound `created_at` inclusively.
/// `search` without `search_by` matches `order_no` as a case-insensitive substring.
#[utoipa::path(
    get,
    path = "/",
    tag = ORDER_TAG,
    params(PagingRequest, OrderListQuery),
    responses(
        (status = 200, description = "One page of orders", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid search, sort or status", body = ApiResponse<ErrorDetail>)
    )
)]
async fn list_orders(
    State(state): State<AppState>,
    QueryParams(req): QueryParams<PagingRequest>,
    QueryParams(filter): QueryParams<OrderListQuery>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let (orders, page) = state
        .services
        .orders
        .list(&state.query_context(), &req, filter.status)
        .await?;
    let data = orders.into_iter().map(OrderResponse::from).collect();
    Ok(ApiResponse::paginate(data, page))
}

/// GET /api/members/{member_id}/orders - One member's orders
#[utoipa::path(
    get,
    path = "/{member_id}/orders",
    tag = ORDER_TAG,
    params(
        ("member_id" = Uuid, Path, description = "Member id"),
        PagingRequest,
        OrderListQuery
    ),
    responses(
        (status = 200, description = "One page of the member's orders", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Invalid search, sort or status", body = ApiResponse<ErrorDetail>)
    )
)]
async fn list_member_orders(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    QueryParams(req): QueryParams<PagingRequest>,
    QueryParams(filter): QueryParams<OrderListQuery>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let (orders, page) = state
        .services
        .orders
        .list_for_member(&state.query_context(), member_id, &req, filter.status)
        .await?;
    let data = orders.into_iter().map(OrderResponse::from).collect();
    Ok(ApiResponse::paginate(data, page))
}

/// GET /api/orders/{id} - Order info
#[utoipa::path(
    get,
    path = "/{id}",
    tag = ORDER_TAG,
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = ApiResponse<ErrorDetail>)
    )
)]
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.services.orders.info(&state.query_context(), id).await?;
    Ok(ApiResponse::ok(OrderResponse::from(order)))
}
