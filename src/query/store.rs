use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use super::value::{SqlValue, Statement};
use crate::error::AppResult;

/// Executes rendered statements against a backing store.
///
/// Rows come back as JSON objects keyed by column name, so one implementation
/// serves every record type.
#[async_trait]
pub trait Store: Send + Sync {
    /// Runs a statement that yields a single `total` count.
    async fn query_count(&self, stmt: Statement) -> AppResult<i64>;

    /// Runs a statement that yields one JSON object per row.
    async fn query_rows(&self, stmt: Statement) -> AppResult<Vec<serde_json::Value>>;

    /// Runs a statement for its side effect, returning affected rows.
    async fn execute(&self, stmt: Statement) -> AppResult<usize>;
}

/// A persisted entity backed by one table.
///
/// Serialized field names must equal column names.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str = "id";

    fn primary_key(&self) -> SqlValue;
}

/// Lets several engines share one store, e.g. one transaction's connection.
#[async_trait]
impl<S: Store + ?Sized> Store for &S {
    async fn query_count(&self, stmt: Statement) -> AppResult<i64> {
        (**self).query_count(stmt).await
    }

    async fn query_rows(&self, stmt: Statement) -> AppResult<Vec<serde_json::Value>> {
        (**self).query_rows(stmt).await
    }

    async fn execute(&self, stmt: Statement) -> AppResult<usize> {
        (**self).execute(stmt).await
    }
}
