//! PostgreSQL backing store over the bb8 pool.

use async_trait::async_trait;
use diesel::QueryableByName;
use diesel::pg::Pg;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Double, Jsonb, Text, Uuid as SqlUuid};
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tokio::sync::Mutex;

use super::engine::QueryEngine;
use super::store::Store;
use super::value::{SqlValue, Statement};
use crate::db::AsyncDbPool;
use crate::error::{AppResult, DatabaseErrorConverter};

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = Jsonb)]
    data: serde_json::Value,
}

/// Turns a rendered statement into a boxed diesel query with typed binds.
fn to_query(stmt: Statement) -> BoxedSqlQuery<'static, Pg, SqlQuery> {
    let mut query = diesel::sql_query(stmt.sql).into_boxed::<Pg>();
    for value in stmt.binds {
        query = match value {
            // Rendered inline by `Statement::push_bind`
            SqlValue::Null => query,
            SqlValue::Bool(v) => query.bind::<Bool, _>(v),
            SqlValue::Int(v) => query.bind::<BigInt, _>(v),
            SqlValue::Float(v) => query.bind::<Double, _>(v),
            SqlValue::Text(v) => query.bind::<Text, _>(v),
            SqlValue::Uuid(v) => query.bind::<SqlUuid, _>(v),
            SqlValue::Timestamp(v) => query.bind::<Text, _>(v.to_string()),
            SqlValue::Json(v) => query.bind::<Jsonb, _>(v),
        };
    }
    query
}

async fn count_on(conn: &mut AsyncPgConnection, stmt: Statement) -> AppResult<i64> {
    tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "count query");
    to_query(stmt)
        .get_result::<CountRow>(conn)
        .await
        .map(|row| row.total)
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "count rows"))
}

async fn rows_on(
    conn: &mut AsyncPgConnection,
    stmt: Statement,
) -> AppResult<Vec<serde_json::Value>> {
    tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "row query");
    to_query(stmt)
        .load::<JsonRow>(conn)
        .await
        .map(|rows| rows.into_iter().map(|row| row.data).collect())
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "load rows"))
}

async fn execute_on(conn: &mut AsyncPgConnection, stmt: Statement) -> AppResult<usize> {
    tracing::debug!(sql = %stmt.sql, binds = stmt.binds.len(), "execute");
    to_query(stmt)
        .execute(conn)
        .await
        .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "execute statement"))
}

/// Pool-backed store. Each call checks out its own connection.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct PgStore {
    pool: AsyncDbPool,
}

impl PgStore {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AsyncDbPool {
        &self.pool
    }

    /// Round-trips `SELECT 1` to confirm the database is reachable.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping"))?;
        Ok(())
    }

    /// Runs `f` inside one database transaction.
    ///
    /// `f` receives an engine bound to the transaction's connection. The
    /// transaction commits when `f` returns `Ok` and rolls back on `Err`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use diesel_async::scoped_futures::ScopedFutureExt;
    ///
    /// store.transaction(|tx| async move {
    ///     tx.insert(&ctx, &prefix).await?;
    ///     tx.insert(&ctx, &audit).await?;
    ///     Ok(())
    /// }.scope_boxed()).await?;
    /// ```
    pub async fn transaction<'a, R, F>(&self, f: F) -> AppResult<R>
    where
        F: for<'r> FnOnce(QueryEngine<TxStore<'r>>) -> ScopedBoxFuture<'a, 'r, AppResult<R>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        let mut conn = self.pool.get().await?;
        AsyncConnection::transaction(&mut *conn, |conn| f(QueryEngine::new(TxStore::new(conn))))
            .await
    }
}

#[async_trait]
impl Store for PgStore {
    async fn query_count(&self, stmt: Statement) -> AppResult<i64> {
        let mut conn = self.pool.get().await?;
        count_on(&mut conn, stmt).await
    }

    async fn query_rows(&self, stmt: Statement) -> AppResult<Vec<serde_json::Value>> {
        let mut conn = self.pool.get().await?;
        rows_on(&mut conn, stmt).await
    }

    async fn execute(&self, stmt: Statement) -> AppResult<usize> {
        let mut conn = self.pool.get().await?;
        execute_on(&mut conn, stmt).await
    }
}

/// Store bound to a single connection inside an open transaction.
pub struct TxStore<'r> {
    conn: Mutex<&'r mut AsyncPgConnection>,
}

impl<'r> TxStore<'r> {
    fn new(conn: &'r mut AsyncPgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Store for TxStore<'_> {
    async fn query_count(&self, stmt: Statement) -> AppResult<i64> {
        let mut conn = self.conn.lock().await;
        count_on(&mut conn, stmt).await
    }

    async fn query_rows(&self, stmt: Statement) -> AppResult<Vec<serde_json::Value>> {
        let mut conn = self.conn.lock().await;
        rows_on(&mut conn, stmt).await
    }

    async fn execute(&self, stmt: Statement) -> AppResult<usize> {
        let mut conn = self.conn.lock().await;
        execute_on(&mut conn, stmt).await
    }
}
