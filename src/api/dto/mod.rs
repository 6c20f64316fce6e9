//! Data Transfer Objects for API requests and responses.
//!
//! Response DTOs serialize with PascalCase keys, which the response
//! envelope transcodes to the configured naming convention.

mod audit_log;
mod health;
mod order;
mod prefix;

pub use audit_log::AuditLogResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use order::{OrderListQuery, OrderResponse};
pub use prefix::{CreatePrefixRequest, PrefixResponse, UpdatePrefixRequest};
