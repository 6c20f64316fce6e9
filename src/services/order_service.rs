use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Order, OrderStatus};
use crate::query::{PageMetadata, PagingRequest, QueryContext};
use crate::repositories::{OrderFilter, OrderRepository};

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
}

impl OrderService {
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }

    /// Admin listing across all members.
    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
        status: Option<OrderStatus>,
    ) -> AppResult<(Vec<Order>, PageMetadata)> {
        let filter = OrderFilter::from_request(req, status);
        self.repo.list(ctx, req, &filter).await
    }

    /// Listing pinned to one member. Client search cannot widen it.
    pub async fn list_for_member(
        &self,
        ctx: &QueryContext,
        member_id: Uuid,
        req: &PagingRequest,
        status: Option<OrderStatus>,
    ) -> AppResult<(Vec<Order>, PageMetadata)> {
        let filter = OrderFilter::from_request(req, status).for_member(member_id);
        self.repo.list(ctx, req, &filter).await
    }

    pub async fn info(&self, ctx: &QueryContext, id: Uuid) -> AppResult<Order> {
        self.repo
            .find_by_id(ctx, id)
            .await?
            .ok_or_else(|| AppError::not_found("order", "id", id))
    }
}
