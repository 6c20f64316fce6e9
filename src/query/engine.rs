//! Generic list and CRUD primitives over any [`Record`].
//!
//! Every method renders a parameterized statement and hands it to the
//! [`Store`]. Identifiers come from the record's constants, from code-defined
//! customizers, or from allow-listed paging input.

use std::time::Instant;

use serde_json::Value;

use super::builder::{Filter, SelectQuery, UpdateQuery};
use super::context::QueryContext;
use super::paging::{ColumnAllowList, PageMetadata, PagingRequest};
use super::store::{Record, Store};
use super::value::{Ident, SqlValue, Statement};
use crate::error::{AppError, AppResult};

/// Alias for the decoded record source in `UPDATE ... FROM`.
const SOURCE_ALIAS: &str = "src";

/// Caller-supplied predicates applied ahead of any client-controlled clause.
pub type Customizer<'c> = &'c (dyn Fn(&mut SelectQuery) + Send + Sync);

#[derive(Clone)]
pub struct QueryEngine<S> {
    store: S,
}

impl<S: Store> QueryEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Paginated, searchable, sortable listing of `T`.
    ///
    /// The customizer runs first so client search and sort can only narrow the
    /// caller's scope. The count always runs before the row fetch, and the row
    /// fetch is skipped entirely when nothing matches.
    ///
    /// # Arguments
    /// * `ctx` - Cancellation and deadline for both queries
    /// * `req` - Client paging, search and sort parameters
    /// * `allow` - Columns this endpoint exposes to search and sort
    /// * `customize` - Optional static predicates (tenant scoping, status filters)
    ///
    /// # Returns
    /// The page of rows and its metadata, or the first validation or store error
    pub async fn get_list<T: Record>(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
        allow: &ColumnAllowList,
        customize: Option<Customizer<'_>>,
    ) -> AppResult<(Vec<T>, PageMetadata)> {
        let started = Instant::now();
        let mut query = SelectQuery::new(T::TABLE);
        if let Some(customize) = customize {
            customize(&mut query);
        }
        req.apply_search(&mut query, allow.search)?;
        req.apply_sort(&mut query, allow.sort)?;

        let total = ctx
            .run(self.store.query_count(query.to_count_statement()))
            .await?;
        let metadata = req.metadata(total);

        if total == 0 {
            tracing::debug!(table = T::TABLE, total, "Empty list");
            return Ok((Vec::new(), metadata));
        }

        req.apply_offset_limit(&mut query);
        let rows = ctx
            .run(self.store.query_rows(query.to_rows_statement()))
            .await?;
        tracing::debug!(
            table = T::TABLE,
            total,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Listed page"
        );

        Ok((decode_rows(rows)?, metadata))
    }

    /// First row matching the customizer's predicates, if any.
    pub async fn get_by<T: Record>(
        &self,
        ctx: &QueryContext,
        customize: impl FnOnce(&mut SelectQuery) + Send,
    ) -> AppResult<Option<T>> {
        let mut query = SelectQuery::new(T::TABLE);
        customize(&mut query);
        query.limit(1);

        let rows = ctx
            .run(self.store.query_rows(query.to_rows_statement()))
            .await?;
        rows.into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn get_by_pk<T: Record>(
        &self,
        ctx: &QueryContext,
        pk: impl Into<SqlValue> + Send,
    ) -> AppResult<Option<T>> {
        self.get_by::<T>(ctx, |q| {
            q.where_eq(T::PRIMARY_KEY, pk);
        })
        .await
    }

    pub async fn count_by<T: Record>(
        &self,
        ctx: &QueryContext,
        customize: impl FnOnce(&mut SelectQuery) + Send,
    ) -> AppResult<i64> {
        let mut query = SelectQuery::new(T::TABLE);
        customize(&mut query);
        ctx.run(self.store.query_count(query.to_count_statement()))
            .await
    }

    /// Every row matching the customizer, unpaginated.
    pub async fn list_all<T: Record>(
        &self,
        ctx: &QueryContext,
        customize: impl FnOnce(&mut SelectQuery) + Send,
    ) -> AppResult<Vec<T>> {
        let mut query = SelectQuery::new(T::TABLE);
        customize(&mut query);
        let rows = ctx
            .run(self.store.query_rows(query.to_rows_statement()))
            .await?;
        decode_rows(rows)
    }

    /// Inserts one record, writing only the columns it serializes.
    pub async fn insert<T: Record>(&self, ctx: &QueryContext, record: &T) -> AppResult<usize> {
        let (columns, source) = encode_record(record)?;
        let table = Ident::from(T::TABLE);
        let column_list = join_idents(columns.iter().map(|c| Ident::from(c.clone())));

        let mut stmt = Statement::default();
        stmt.push_sql(&format!(
            "INSERT INTO {table} ({column_list}) SELECT {column_list} FROM jsonb_populate_record(NULL::{table}, "
        ));
        stmt.push_bind(SqlValue::Json(source));
        stmt.push_sql(")");

        ctx.run(self.store.execute(stmt)).await
    }

    /// Updates the row sharing `record`'s primary key.
    ///
    /// With an empty `columns`, every serialized column except the key is written.
    pub async fn update_by_pk<T: Record>(
        &self,
        ctx: &QueryContext,
        record: &T,
        columns: &[&str],
    ) -> AppResult<usize> {
        let (serialized, source) = encode_record(record)?;
        let targets: Vec<String> = if columns.is_empty() {
            serialized
                .into_iter()
                .filter(|c| c != T::PRIMARY_KEY)
                .collect()
        } else {
            columns.iter().map(|c| c.to_string()).collect()
        };
        if targets.is_empty() {
            return Err(AppError::bad_request("update requires at least one column"));
        }

        let table = Ident::from(T::TABLE);
        let assignments = targets
            .iter()
            .map(|c| {
                format!(
                    "{} = {}",
                    Ident::from(c.clone()),
                    Ident::from(format!("{SOURCE_ALIAS}.{c}"))
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = Statement::default();
        stmt.push_sql(&format!(
            "UPDATE {table} SET {assignments} FROM jsonb_populate_record(NULL::{table}, "
        ));
        stmt.push_bind(SqlValue::Json(source));
        stmt.push_sql(&format!(
            ") AS {SOURCE_ALIAS} WHERE {} = ",
            Ident::from(format!("{}.{}", T::TABLE, T::PRIMARY_KEY))
        ));
        stmt.push_bind(record.primary_key());

        ctx.run(self.store.execute(stmt)).await
    }

    /// Updates rows of `T` by predicate. Refuses to run without one.
    pub async fn update_where<T: Record>(
        &self,
        ctx: &QueryContext,
        build: impl FnOnce(&mut UpdateQuery) + Send,
    ) -> AppResult<usize> {
        let mut update = UpdateQuery::new(T::TABLE);
        build(&mut update);
        if update.assignments().is_empty() {
            return Err(AppError::bad_request("update requires at least one column"));
        }
        if update.conditions().is_empty() {
            return Err(unscoped("update", T::TABLE));
        }
        ctx.run(self.store.execute(update.to_statement())).await
    }

    pub async fn delete_by_pk<T: Record>(
        &self,
        ctx: &QueryContext,
        pk: impl Into<SqlValue> + Send,
    ) -> AppResult<usize> {
        self.delete_where::<T>(ctx, |q| {
            q.where_eq(T::PRIMARY_KEY, pk);
        })
        .await
    }

    /// Deletes rows of `T` by predicate. Refuses to run without one.
    pub async fn delete_where<T: Record>(
        &self,
        ctx: &QueryContext,
        customize: impl FnOnce(&mut SelectQuery) + Send,
    ) -> AppResult<usize> {
        let mut query = SelectQuery::new(T::TABLE);
        customize(&mut query);
        if query.conditions().is_empty() {
            return Err(unscoped("delete", T::TABLE));
        }
        ctx.run(self.store.execute(query.to_delete_statement()))
            .await
    }
}

fn unscoped(verb: &str, table: &str) -> AppError {
    AppError::Internal {
        source: anyhow::anyhow!("refusing {verb} on {table} without a predicate"),
    }
}

fn decode_rows<T: Record>(rows: Vec<Value>) -> AppResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}

/// Serializes a record to a JSON object and lists its keys.
fn encode_record<T: Record>(record: &T) -> AppResult<(Vec<String>, Value)> {
    let value = serde_json::to_value(record)?;
    let Value::Object(map) = &value else {
        return Err(AppError::Internal {
            source: anyhow::anyhow!("{} does not serialize to an object", T::TABLE),
        });
    };
    let columns = map.keys().cloned().collect();
    Ok((columns, value))
}

fn join_idents(idents: impl Iterator<Item = Ident>) -> String {
    idents
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
