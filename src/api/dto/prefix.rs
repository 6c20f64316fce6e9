//! Prefix request and response DTOs.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewPrefix, Prefix, PrefixChanges};

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePrefixRequest {
    #[validate(length(min = 1, max = 50, message = "name_th must be 1 to 50 characters"))]
    #[schema(example = "นาย", min_length = 1, max_length = 50)]
    pub name_th: String,
    #[validate(length(min = 1, max = 50, message = "name_en must be 1 to 50 characters"))]
    #[schema(example = "Mr.", min_length = 1, max_length = 50)]
    pub name_en: String,
    pub gender_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: bool,
}

impl From<CreatePrefixRequest> for NewPrefix {
    fn from(req: CreatePrefixRequest) -> Self {
        NewPrefix {
            name_th: req.name_th,
            name_en: req.name_en,
            gender_id: req.gender_id,
            is_active: req.is_active,
        }
    }
}

/// Empty names keep the stored value. `is_active` is always applied.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePrefixRequest {
    #[validate(length(max = 50, message = "name_th must be at most 50 characters"))]
    pub name_th: Option<String>,
    #[validate(length(max = 50, message = "name_en must be at most 50 characters"))]
    pub name_en: Option<String>,
    pub gender_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: bool,
}

impl From<UpdatePrefixRequest> for PrefixChanges {
    fn from(req: UpdatePrefixRequest) -> Self {
        PrefixChanges {
            name_th: req.name_th,
            name_en: req.name_en,
            gender_id: req.gender_id,
            is_active: req.is_active,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PrefixResponse {
    // Two-letter keys bypass transcoding, so the wire name is fixed here
    #[serde(rename = "id")]
    pub id: Uuid,
    pub name_th: String,
    pub name_en: String,
    pub gender_id: Option<Uuid>,
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Prefix> for PrefixResponse {
    fn from(prefix: Prefix) -> Self {
        Self {
            id: prefix.id,
            name_th: prefix.name_th,
            name_en: prefix.name_en,
            gender_id: prefix.gender_id,
            is_active: prefix.is_active,
            created_at: prefix.created_at,
            updated_at: prefix.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::response::{NamingConvention, to_json};

    #[test]
    fn test_prefix_response_snake_case_keys() {
        let prefix = Prefix::new("นาย".into(), "Mr.".into(), None, true);
        let body = to_json(&PrefixResponse::from(prefix), NamingConvention::SnakeCase).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert!(value.get("id").is_some());
        assert_eq!(value["name_th"], "นาย");
        assert_eq!(value["is_active"], true);
        assert!(value["gender_id"].is_null());
        assert!(value.get("created_at").is_some());
    }

    #[test]
    fn test_prefix_response_camel_case_keys() {
        let prefix = Prefix::new("นาง".into(), "Mrs.".into(), None, false);
        let body = to_json(&PrefixResponse::from(prefix), NamingConvention::CamelCase).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(value["nameEn"], "Mrs.");
        assert_eq!(value["isActive"], false);
        assert!(value.get("id").is_some());
    }

    #[test]
    fn test_create_request_validation() {
        let req = CreatePrefixRequest {
            name_th: String::new(),
            name_en: "x".repeat(51),
            gender_id: None,
            is_active: true,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name_th"));
        assert!(fields.contains_key("name_en"));
    }
}
