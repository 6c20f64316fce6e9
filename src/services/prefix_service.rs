//! Prefix service: CRUD with an audit trail.
//!
//! Every write commits together with its `success` audit row. When the write
//! fails, a `fail` audit row is stored separately on a best-effort basis.

use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AuditAction, AuditLog, NewPrefix, Prefix, PrefixChanges};
use crate::query::{PageMetadata, PagingRequest, PgStore, QueryContext, QueryEngine};
use crate::repositories::{AuditLogRepository, PrefixRepository};

#[derive(Clone)]
pub struct PrefixService {
    store: PgStore,
    prefixes: PrefixRepository,
    audit_logs: AuditLogRepository,
}

impl PrefixService {
    pub fn new(store: PgStore, prefixes: PrefixRepository, audit_logs: AuditLogRepository) -> Self {
        Self {
            store,
            prefixes,
            audit_logs,
        }
    }

    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
    ) -> AppResult<(Vec<Prefix>, PageMetadata)> {
        self.prefixes.list(ctx, req).await
    }

    pub async fn get(&self, ctx: &QueryContext, id: Uuid) -> AppResult<Prefix> {
        self.prefixes
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| AppError::not_found("prefix", "id", id))
    }

    pub async fn create(&self, ctx: &QueryContext, input: NewPrefix) -> AppResult<Prefix> {
        let prefix = Prefix::from(input);
        let id = prefix.id;

        let outcome = self
            .store
            .transaction(|tx| {
                let prefix = &prefix;
                async move {
                    PrefixRepository::new(QueryEngine::new(tx.store()))
                        .create(ctx, prefix)
                        .await?;
                    AuditLogRepository::new(QueryEngine::new(tx.store()))
                        .record(ctx, &success_log(AuditAction::Create, id))
                        .await
                }
                .scope_boxed()
            })
            .await;

        self.settle(ctx, AuditAction::Create, id, outcome).await?;
        tracing::info!(prefix_id = %id, "Prefix created");
        Ok(prefix)
    }

    pub async fn update(
        &self,
        ctx: &QueryContext,
        id: Uuid,
        changes: PrefixChanges,
    ) -> AppResult<Prefix> {
        let outcome = self
            .store
            .transaction(|tx| {
                async move {
                    let prefixes = PrefixRepository::new(QueryEngine::new(tx.store()));
                    let mut prefix = prefixes
                        .find_by_id(ctx, id)
                        .await?
                        .ok_or_else(|| AppError::not_found("prefix", "id", id))?;
                    prefix.apply(changes);
                    prefixes.update(ctx, &prefix).await?;

                    AuditLogRepository::new(QueryEngine::new(tx.store()))
                        .record(ctx, &success_log(AuditAction::Update, id))
                        .await?;
                    Ok(prefix)
                }
                .scope_boxed()
            })
            .await;

        let prefix = self.settle(ctx, AuditAction::Update, id, outcome).await?;
        tracing::info!(prefix_id = %id, "Prefix updated");
        Ok(prefix)
    }

    pub async fn delete(&self, ctx: &QueryContext, id: Uuid) -> AppResult<()> {
        let outcome = self
            .store
            .transaction(|tx| {
                async move {
                    let deleted = PrefixRepository::new(QueryEngine::new(tx.store()))
                        .delete(ctx, id)
                        .await?;
                    if deleted == 0 {
                        return Err(AppError::not_found("prefix", "id", id));
                    }
                    AuditLogRepository::new(QueryEngine::new(tx.store()))
                        .record(ctx, &success_log(AuditAction::Delete, id))
                        .await
                }
                .scope_boxed()
            })
            .await;

        self.settle(ctx, AuditAction::Delete, id, outcome).await?;
        tracing::info!(prefix_id = %id, "Prefix deleted");
        Ok(())
    }

    /// Passes `outcome` through, storing a `fail` audit row first when it is an error.
    async fn settle<T>(
        &self,
        ctx: &QueryContext,
        action: AuditAction,
        id: Uuid,
        outcome: AppResult<T>,
    ) -> AppResult<T> {
        let Err(error) = outcome else {
            return outcome;
        };

        let log = failure_log(action, id, &error);
        if let Err(audit_error) = self.audit_logs.record(ctx, &log).await {
            tracing::warn!(
                prefix_id = %id,
                error = %audit_error,
                "Failed to store failure audit row"
            );
        }
        Err(error)
    }
}

fn action_type(action: AuditAction) -> &'static str {
    match action {
        AuditAction::Create => "create_prefix",
        AuditAction::Update => "update_prefix",
        AuditAction::Delete => "delete_prefix",
    }
}

fn success_log(action: AuditAction, id: Uuid) -> AuditLog {
    let verb = match action {
        AuditAction::Create => "Created",
        AuditAction::Update => "Updated",
        AuditAction::Delete => "Deleted",
    };
    AuditLog::success(
        action,
        action_type(action),
        id,
        format!("{verb} prefix with ID {id}"),
    )
}

fn failure_log(action: AuditAction, id: Uuid, error: &AppError) -> AuditLog {
    let verb = match action {
        AuditAction::Create => "Create",
        AuditAction::Update => "Update",
        AuditAction::Delete => "Delete",
    };
    AuditLog::failure(
        action,
        action_type(action),
        Some(id),
        format!("{verb} prefix failed: {error}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditStatus;

    #[test]
    fn test_success_log_shape() {
        let id = Uuid::new_v4();
        let log = success_log(AuditAction::Update, id);

        assert_eq!(log.action_type, "update_prefix");
        assert_eq!(log.status, AuditStatus::Success);
        assert_eq!(log.action_id, Some(id));
        assert_eq!(log.action_detail, format!("Updated prefix with ID {id}"));
    }

    #[test]
    fn test_failure_log_carries_error() {
        let id = Uuid::new_v4();
        let error = AppError::not_found("prefix", "id", id);
        let log = failure_log(AuditAction::Delete, id, &error);

        assert_eq!(log.action_type, "delete_prefix");
        assert_eq!(log.status, AuditStatus::Fail);
        assert!(log.action_detail.starts_with("Delete prefix failed: "));
        assert!(log.action_detail.contains(&id.to_string()));
    }
}
