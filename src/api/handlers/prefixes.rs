//! Prefix CRUD request handlers.

use axum::extract::{Path, State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::PREFIX_TAG;
use crate::api::dto::{CreatePrefixRequest, PrefixResponse, UpdatePrefixRequest};
use crate::api::middleware::ErrorDetail;
use crate::api::response::ApiResponse;
use crate::error::AppResult;
use crate::query::PagingRequest;
use crate::state::AppState;
use crate::utils::{QueryParams, ValidatedJson};

pub fn prefix_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_prefixes, create_prefix))
        .routes(routes!(get_prefix, update_prefix, delete_prefix))
}

/// GET /api/prefixes - Paginated prefix list
///
/// Search by `name_th` or `name_en`; sort by `created_at`, `name_th` or `name_en`.
#[utoipa::path(
    get,
    path = "/",
    tag = PREFIX_TAG,
    params(PagingRequest),
    responses(
        (status = 200, description = "One page of prefixes", body = ApiResponse<Vec<PrefixResponse>>),
        (status = 400, description = "Invalid search or sort parameters", body = ApiResponse<ErrorDetail>)
    )
)]
async fn list_prefixes(
    State(state): State<AppState>,
    QueryParams(req): QueryParams<PagingRequest>,
) -> AppResult<ApiResponse<Vec<PrefixResponse>>> {
    let ctx = state.query_context();
    let (prefixes, page) = state.services.prefixes.list(&ctx, &req).await?;
    let data = prefixes.into_iter().map(PrefixResponse::from).collect();
    Ok(ApiResponse::paginate(data, page))
}

/// GET /api/prefixes/{id} - Prefix info
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PREFIX_TAG,
    params(("id" = Uuid, Path, description = "Prefix id")),
    responses(
        (status = 200, description = "Prefix found", body = ApiResponse<PrefixResponse>),
        (status = 404, description = "Prefix not found", body = ApiResponse<ErrorDetail>)
    )
)]
async fn get_prefix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<PrefixResponse>> {
    let prefix = state.services.prefixes.get(&state.query_context(), id).await?;
    Ok(ApiResponse::ok(PrefixResponse::from(prefix)))
}

/// POST /api/prefixes - Create a prefix
#[utoipa::path(
    post,
    path = "/",
    tag = PREFIX_TAG,
    request_body = CreatePrefixRequest,
    responses(
        (status = 201, description = "Prefix created", body = ApiResponse<PrefixResponse>),
        (status = 400, description = "Invalid request body", body = ApiResponse<ErrorDetail>),
        (status = 409, description = "Prefix already exists", body = ApiResponse<ErrorDetail>)
    )
)]
async fn create_prefix(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePrefixRequest>,
) -> AppResult<ApiResponse<PrefixResponse>> {
    let prefix = state
        .services
        .prefixes
        .create(&state.query_context(), req.into())
        .await?;
    Ok(ApiResponse::created(PrefixResponse::from(prefix)))
}

/// PUT /api/prefixes/{id} - Update a prefix
#[utoipa::path(
    put,
    path = "/{id}",
    tag = PREFIX_TAG,
    params(("id" = Uuid, Path, description = "Prefix id")),
    request_body = UpdatePrefixRequest,
    responses(
        (status = 200, description = "Prefix updated", body = ApiResponse<PrefixResponse>),
        (status = 404, description = "Prefix not found", body = ApiResponse<ErrorDetail>)
    )
)]
async fn update_prefix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePrefixRequest>,
) -> AppResult<ApiResponse<PrefixResponse>> {
    let prefix = state
        .services
        .prefixes
        .update(&state.query_context(), id, req.into())
        .await?;
    Ok(ApiResponse::ok(PrefixResponse::from(prefix)))
}

/// DELETE /api/prefixes/{id} - Delete a prefix
///
/// Responds with the id of the removed prefix.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PREFIX_TAG,
    params(("id" = Uuid, Path, description = "Prefix id")),
    responses(
        (status = 200, description = "Prefix deleted", body = ApiResponse<Uuid>),
        (status = 404, description = "Prefix not found", body = ApiResponse<ErrorDetail>)
    )
)]
async fn delete_prefix(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Uuid>> {
    state
        .services
        .prefixes
        .delete(&state.query_context(), id)
        .await?;
    Ok(ApiResponse::ok(id).with_message("deleted"))
}
