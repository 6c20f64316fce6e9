use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::query::{Record, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Fail,
}

/// One write against a tracked resource, successful or not.
///
/// `action_type` names the operation and resource (`create_prefix`,
/// `update_prefix`, `delete_prefix`), `action_id` the affected row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub action_type: String,
    pub action_id: Option<Uuid>,
    pub action_by: Option<Uuid>,
    pub status: AuditStatus,
    pub action_detail: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record for AuditLog {
    const TABLE: &'static str = "audit_logs";

    fn primary_key(&self) -> SqlValue {
        self.id.into()
    }
}

impl AuditLog {
    pub fn new(
        action: AuditAction,
        action_type: &str,
        action_id: Option<Uuid>,
        status: AuditStatus,
        action_detail: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            action,
            action_type: action_type.to_string(),
            action_id,
            action_by: None,
            status,
            action_detail: action_detail.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn success(
        action: AuditAction,
        action_type: &str,
        action_id: Uuid,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(action, action_type, Some(action_id), AuditStatus::Success, detail)
    }

    pub fn failure(
        action: AuditAction,
        action_type: &str,
        action_id: Option<Uuid>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(action, action_type, action_id, AuditStatus::Fail, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_log_serializes_column_names() {
        let id = Uuid::new_v4();
        let log = AuditLog::success(AuditAction::Update, "update_prefix", id, "renamed");
        let value = serde_json::to_value(&log).unwrap();

        assert_eq!(value["action"], "update");
        assert_eq!(value["status"], "success");
        assert_eq!(value["action_type"], "update_prefix");
        assert_eq!(value["action_id"], id.to_string());
        assert!(value["action_by"].is_null());
    }

    #[test]
    fn test_audit_log_decodes_postgres_json() {
        let row = serde_json::json!({
            "id": "6f9619ff-8b86-d011-b42d-00c04fc964ff",
            "action": "delete",
            "action_type": "delete_prefix",
            "action_id": null,
            "action_by": null,
            "status": "fail",
            "action_detail": "prefix not found",
            "created_at": "2024-03-01T10:00:00.123456+00:00",
            "updated_at": "2024-03-01T10:00:00.123456+00:00"
        });
        let log: AuditLog = serde_json::from_value(row).unwrap();
        assert_eq!(log.action, AuditAction::Delete);
        assert_eq!(log.status, AuditStatus::Fail);
        assert_eq!(log.action_id, None);
    }
}
