//! Error handler for converting AppError to HTTP responses.
//!
//! Errors render through the same [`ApiResponse`] envelope as successes, with an
//! [`ErrorDetail`] payload carrying a stable error code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::api::response::ApiResponse;
use crate::error::AppError;

/// Payload of every error response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    /// Stable error category
    #[schema(example = "INVALID_SEARCH_LENGTH")]
    pub error: String,
    /// Extra structured context, e.g. per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn new(code: &str) -> Self {
        Self {
            error: code.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. }
        | AppError::Paging(_) => StatusCode::BAD_REQUEST,
        AppError::ConnectionPool { .. } | AppError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Paging(err) => err.code(),
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Cancelled => "CANCELLED",
        AppError::Timeout { .. } => "TIMEOUT",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Client-facing message. Server-side failures never leak their source.
fn public_message(error: &AppError) -> String {
    match error {
        AppError::ValidationErrors { .. } => "Validation failed".to_string(),
        AppError::BadRequest { message } => message.clone(),
        AppError::Database { .. } => "Database operation failed".to_string(),
        AppError::ConnectionPool { .. } => "Database connection unavailable".to_string(),
        AppError::Configuration { .. } | AppError::Internal { .. } => {
            "An internal error occurred".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for AppError {
    /// Converts an AppError into an enveloped HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation / ValidationErrors / BadRequest / Paging → 400 BAD_REQUEST
    /// - ConnectionPool / Cancelled → 503 SERVICE_UNAVAILABLE
    /// - Timeout → 504 GATEWAY_TIMEOUT
    /// - Database / Configuration / Internal → 500 INTERNAL_SERVER_ERROR
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut detail = ErrorDetail::new(error_to_code(&self));
        if let AppError::ValidationErrors { errors } = &self {
            let fields: Vec<_> = errors
                .iter()
                .map(|e| json!({ "Field": e.field, "Message": e.message }))
                .collect();
            detail = detail.with_details(json!(fields));
        }

        ApiResponse::error(status, &public_message(&self), detail).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON format: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(_) => "JSON syntax error".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing or invalid Content-Type header, expected application/json".to_string()
            }
            JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
            _ => "Failed to parse JSON request".to_string(),
        };
        AppError::BadRequest { message }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: format!("Invalid query parameters: {}", rejection.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest {
            message: format!("Invalid path parameters: {}", rejection.body_text()),
        }
    }
}

/// Wraps bare error responses (unmatched routes, wrong methods, framework
/// rejections) in the standard envelope.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (_parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let original = String::from_utf8_lossy(&body_bytes).trim().to_string();

    let (code, fallback) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timed out"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::UNPROCESSABLE_ENTITY => ("UNPROCESSABLE_CONTENT", "Unprocessable content"),
        _ if status.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };
    let message = if original.is_empty() || status.is_server_error() {
        fallback.to_string()
    } else {
        original
    };

    ApiResponse::error(status, &message, ErrorDetail::new(code)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response::NamingConvention;
    use crate::error::ValidationFieldError;
    use crate::query::PagingError;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (AppError::not_found("prefix", "id", "1"), StatusCode::NOT_FOUND),
            (
                AppError::Duplicate {
                    entity: "prefixes".into(),
                    field: "name_th".into(),
                    value: "x".into(),
                },
                StatusCode::CONFLICT,
            ),
            (AppError::bad_request("nope"), StatusCode::BAD_REQUEST),
            (PagingError::InvalidSearchColumn.into(), StatusCode::BAD_REQUEST),
            (
                AppError::ConnectionPool {
                    source: anyhow::anyhow!("down"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Timeout {
                    after: Duration::from_secs(1),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::Internal {
                    source: anyhow::anyhow!("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error_to_status_code(&error), status, "{error:?}");
        }
    }

    #[test]
    fn test_paging_error_code_is_category() {
        let error: AppError = PagingError::InvalidSearchLength.into();
        assert_eq!(error_to_code(&error), "INVALID_SEARCH_LENGTH");
        assert_eq!(public_message(&error), "paginate: invalid search length < 3");
    }

    #[test]
    fn test_internal_error_sanitization() {
        let error = AppError::Database {
            operation: "load rows".into(),
            source: anyhow::anyhow!("password authentication failed"),
        };
        assert_eq!(public_message(&error), "Database operation failed");
    }

    #[tokio::test]
    async fn test_paging_error_envelope() {
        let error: AppError = PagingError::InvalidSortColumn.into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let status = body
            .get("status")
            .or_else(|| body.get("Status"))
            .and_then(|s| s.as_object())
            .unwrap();
        assert!(
            status
                .values()
                .any(|v| v == "paginate: invalid sort_by cols")
        );
    }

    #[tokio::test]
    async fn test_validation_errors_envelope() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "name_th".into(),
                message: "required".into(),
            }],
        };
        let response = ApiResponse::error(
            error_to_status_code(&error),
            &public_message(&error),
            ErrorDetail::new(error_to_code(&error)),
        )
        .with_naming(NamingConvention::SnakeCase)
        .into_response();

        let body = body_json(response).await;
        assert_eq!(body["status"]["code"], "400");
        assert_eq!(body["status"]["message"], "Validation failed");
        assert_eq!(body["data"]["error"], "VALIDATION_ERROR");
        assert!(body["paginate"].is_null());
    }

    #[tokio::test]
    async fn test_global_error_handler_wraps_not_found() {
        let app = Router::new()
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_global_error_handler_passes_success() {
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .layer(middleware::from_fn(global_error_handler));

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
