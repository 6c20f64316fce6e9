use utoipa::OpenApi;

pub const PREFIX_TAG: &str = "Prefixes";
pub const ORDER_TAG: &str = "Orders";
pub const AUDIT_LOG_TAG: &str = "Audit Logs";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront",
        description = "Paginated storefront back-office API",
    ),
    components(
        schemas(
            crate::api::middleware::ErrorDetail,
            crate::api::response::ResponseStatus,
            crate::query::PageMetadata,
            crate::models::OrderStatus,
            crate::models::AuditAction,
            crate::models::AuditStatus,
        )
    ),
    tags(
        (name = PREFIX_TAG, description = "Name prefix management endpoints"),
        (name = ORDER_TAG, description = "Order listing endpoints"),
        (name = AUDIT_LOG_TAG, description = "Audit trail endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
