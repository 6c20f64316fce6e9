use crate::error::AppResult;
use crate::models::AuditLog;
use crate::query::{
    CmpOp, ColumnAllowList, Filter, PageMetadata, PagingRequest, PgStore, QueryContext,
    QueryEngine, SelectQuery, Store,
};

pub const AUDIT_LOG_COLUMNS: ColumnAllowList =
    ColumnAllowList::new(&["action_type", "status"], &["created_at", "action_type"]);

#[derive(Clone)]
pub struct AuditLogRepository<S = PgStore> {
    engine: QueryEngine<S>,
}

impl<S: Store> AuditLogRepository<S> {
    pub fn new(engine: QueryEngine<S>) -> Self {
        Self { engine }
    }

    /// Lists audit rows, restricted to the UTC day of `req.date` when present.
    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
    ) -> AppResult<(Vec<AuditLog>, PageMetadata)> {
        let window = req.day_window();
        let scope = move |q: &mut SelectQuery| {
            if let Some((start, end)) = window {
                q.where_cmp("created_at", CmpOp::Gte, start)
                    .where_cmp("created_at", CmpOp::Lt, end);
            }
        };
        self.engine
            .get_list::<AuditLog>(ctx, req, &AUDIT_LOG_COLUMNS, Some(&scope))
            .await
    }

    pub async fn record(&self, ctx: &QueryContext, log: &AuditLog) -> AppResult<()> {
        self.engine.insert(ctx, log).await?;
        Ok(())
    }
}
