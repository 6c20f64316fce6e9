use std::sync::LazyLock;

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use regex::Regex;

use crate::error::AppError;

/// Matches Postgres violation details such as `Key (name_th)=(Mr) already exists.`
static KEY_DETAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Key \((?P<field>[^)]+)\)=\((?P<value>.*)\)").expect("valid key detail pattern")
});

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    ///
    /// # Returns
    /// An AppError variant appropriate for the type of database error
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let entity = info.table_name().unwrap_or("resource").to_string();
        let key = info.details().and_then(Self::parse_key_detail);

        match (kind, key) {
            (DatabaseErrorKind::UniqueViolation, Some((field, value))) => AppError::Duplicate {
                entity,
                field,
                value,
            },
            (DatabaseErrorKind::ForeignKeyViolation, Some((field, value))) => {
                AppError::Validation {
                    field,
                    reason: format!("Invalid reference from {entity} with value '{value}'"),
                }
            }
            (DatabaseErrorKind::NotNullViolation, _) => AppError::Validation {
                field: info.column_name().unwrap_or("unknown").to_string(),
                reason: format!("Field is required for {entity}"),
            },
            (DatabaseErrorKind::CheckViolation, _) => AppError::Validation {
                field: info.constraint_name().unwrap_or("unknown").to_string(),
                reason: format!("Check constraint failed for {entity}"),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", info.message())),
            },
        }
    }

    /// Extracts `(field, value)` from a Postgres `Key (...)=(...)` detail line.
    fn parse_key_detail(detail: &str) -> Option<(String, String)> {
        let caps = KEY_DETAIL.captures(detail)?;
        Some((caps["field"].to_string(), caps["value"].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        details: Option<String>,
        table: Option<String>,
        column: Option<String>,
    }

    impl DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            self.details.as_deref()
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            self.table.as_deref()
        }

        fn column_name(&self) -> Option<&str> {
            self.column.as_deref()
        }

        fn constraint_name(&self) -> Option<&str> {
            None
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, details: Option<&str>, column: Option<&str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(MockDatabaseErrorInfo {
                message: "violation".to_string(),
                details: details.map(str::to_string),
                table: Some("prefixes".to_string()),
                column: column.map(str::to_string),
            }),
        )
    }

    #[test]
    fn test_convert_not_found_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn test_convert_unique_violation() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            Some("Key (name_th)=(นาย) already exists."),
            None,
        );
        match DatabaseErrorConverter::convert_diesel_error(error, "insert prefix") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "prefixes");
                assert_eq!(field, "name_th");
                assert_eq!(value, "นาย");
            }
            other => panic!("Expected Duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_unique_violation_without_detail() {
        let error = db_error(DatabaseErrorKind::UniqueViolation, None, None);
        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert prefix");
        assert!(matches!(result, AppError::Database { .. }));
    }

    #[test]
    fn test_convert_not_null_violation() {
        let error = db_error(DatabaseErrorKind::NotNullViolation, None, Some("name_en"));
        match DatabaseErrorConverter::convert_diesel_error(error, "insert prefix") {
            AppError::Validation { field, .. } => assert_eq!(field, "name_en"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_other_error() {
        let result = DatabaseErrorConverter::convert_diesel_error(
            DieselError::RollbackTransaction,
            "commit",
        );
        match result {
            AppError::Database { operation, .. } => assert_eq!(operation, "commit"),
            other => panic!("Expected Database error, got {other:?}"),
        }
    }
}
