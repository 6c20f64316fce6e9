use jiff::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{AuditAction, AuditLog, AuditStatus};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AuditLogResponse {
    #[serde(rename = "id")]
    pub id: Uuid,
    pub action: AuditAction,
    #[schema(example = "create_prefix")]
    pub action_type: String,
    pub action_id: Option<Uuid>,
    pub action_by: Option<Uuid>,
    pub status: AuditStatus,
    pub action_detail: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            action: log.action,
            action_type: log.action_type,
            action_id: log.action_id,
            action_by: log.action_by,
            status: log.status,
            action_detail: log.action_detail,
            created_at: log.created_at,
        }
    }
}
