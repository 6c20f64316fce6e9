use crate::error::AppResult;
use crate::models::AuditLog;
use crate::query::{PageMetadata, PagingRequest, QueryContext};
use crate::repositories::AuditLogRepository;

#[derive(Clone)]
pub struct AuditLogService {
    repo: AuditLogRepository,
}

impl AuditLogService {
    pub fn new(repo: AuditLogRepository) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
    ) -> AppResult<(Vec<AuditLog>, PageMetadata)> {
        self.repo.list(ctx, req).await
    }
}
