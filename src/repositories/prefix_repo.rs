//! Prefix repository over the generic query engine.

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Prefix;
use crate::query::{
    ColumnAllowList, PageMetadata, PagingRequest, PgStore, QueryContext, QueryEngine, Store,
};

/// Columns clients may search and sort prefixes by.
pub const PREFIX_COLUMNS: ColumnAllowList = ColumnAllowList::new(
    &["name_th", "name_en"],
    &["created_at", "name_th", "name_en"],
);

/// Columns an update may change. `id` and `created_at` are fixed at insert.
const UPDATABLE: &[&str] = &["name_th", "name_en", "gender_id", "is_active", "updated_at"];

/// Works against the pool or, inside [`PgStore::transaction`], a single connection.
#[derive(Clone)]
pub struct PrefixRepository<S = PgStore> {
    engine: QueryEngine<S>,
}

impl<S: Store> PrefixRepository<S> {
    pub fn new(engine: QueryEngine<S>) -> Self {
        Self { engine }
    }

    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
    ) -> AppResult<(Vec<Prefix>, PageMetadata)> {
        self.engine
            .get_list::<Prefix>(ctx, req, &PREFIX_COLUMNS, None)
            .await
    }

    pub async fn find_by_id(&self, ctx: &QueryContext, id: Uuid) -> AppResult<Option<Prefix>> {
        self.engine.get_by_pk::<Prefix>(ctx, id).await
    }

    pub async fn create(&self, ctx: &QueryContext, prefix: &Prefix) -> AppResult<()> {
        self.engine.insert(ctx, prefix).await?;
        Ok(())
    }

    /// Returns the number of rows written, 0 when `prefix.id` does not exist.
    pub async fn update(&self, ctx: &QueryContext, prefix: &Prefix) -> AppResult<usize> {
        self.engine.update_by_pk(ctx, prefix, UPDATABLE).await
    }

    pub async fn delete(&self, ctx: &QueryContext, id: Uuid) -> AppResult<usize> {
        self.engine.delete_by_pk::<Prefix>(ctx, id).await
    }
}
