use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use super::naming::{self, NamingConvention};
use super::transcode;
use crate::query::PageMetadata;

pub const MSG_SUCCESS: &str = "success";
pub const MSG_CREATED: &str = "created";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseStatus {
    #[schema(example = "success")]
    pub message: String,
    /// HTTP status as decimal text
    #[schema(example = "200")]
    pub code: String,
}

/// Standard response body: status, payload and optional page metadata.
///
/// Keys are written PascalCase here and transcoded to the active
/// [`NamingConvention`] when the response is rendered.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: Option<T>,
    pub paginate: Option<PageMetadata>,
    #[serde(skip)]
    http_status: StatusCode,
    #[serde(skip)]
    naming: Option<NamingConvention>,
}

impl<T> ApiResponse<T> {
    fn build(http_status: StatusCode, message: &str, data: Option<T>) -> Self {
        Self {
            status: ResponseStatus {
                message: message.to_string(),
                code: http_status.as_u16().to_string(),
            },
            data,
            paginate: None,
            http_status,
            naming: None,
        }
    }

    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self::build(StatusCode::OK, MSG_SUCCESS, Some(data))
    }

    /// 200 with a page of rows and its metadata.
    pub fn paginate(data: T, page: PageMetadata) -> Self {
        let mut response = Self::ok(data);
        response.paginate = Some(page);
        response
    }

    /// 201 with the created resource.
    pub fn created(data: T) -> Self {
        Self::build(StatusCode::CREATED, MSG_CREATED, Some(data))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.status.message = message.into();
        self
    }

    /// Overrides the process-wide naming convention for this response only.
    pub fn with_naming(mut self, naming: NamingConvention) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.http_status
    }
}

impl ApiResponse<()> {
    /// Status-only response with a null payload.
    pub fn message(http_status: StatusCode, message: &str) -> Self {
        Self::build(http_status, message, None)
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Error response carrying an error detail as its payload.
    pub fn error(http_status: StatusCode, message: &str, detail: T) -> Self {
        Self::build(http_status, message, Some(detail))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let naming = self.naming.unwrap_or_else(naming::current);
        match transcode::to_json(&self, naming) {
            Ok(body) => (
                self.http_status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Failed to encode response body");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
