//! Order repository: admin and member-scoped listings.

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Order, OrderStatus};
use crate::query::{
    CmpOp, ColumnAllowList, Filter, PageMetadata, PagingRequest, PgStore, QueryContext,
    QueryEngine, SelectQuery, Store,
};

pub const ORDER_COLUMNS: ColumnAllowList = ColumnAllowList::new(
    &["order_no", "member_id", "status"],
    &["created_at", "order_no", "member_id", "status"],
);

/// Server-side predicates layered under the client's search and sort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub member_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    /// Free-text `order_no` substring, used when no `search_by` column is named
    pub order_no: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`
    pub created_to: Option<Timestamp>,
}

impl OrderFilter {
    pub fn from_request(req: &PagingRequest, status: Option<OrderStatus>) -> Self {
        let order_no = if req.search_by.as_deref().is_some_and(|c| !c.is_empty()) {
            None
        } else {
            req.sanitized_search().filter(|s| !s.is_empty())
        };
        Self {
            member_id: None,
            status,
            order_no,
            created_from: req.start_date(),
            created_to: req.end_date(),
        }
    }

    pub fn for_member(mut self, member_id: Uuid) -> Self {
        self.member_id = Some(member_id);
        self
    }

    pub fn apply(&self, query: &mut SelectQuery) {
        if let Some(member_id) = self.member_id {
            query.where_eq("member_id", member_id);
        }
        if let Some(status) = self.status {
            query.where_eq("status", status);
        }
        if let Some(order_no) = &self.order_no {
            query.where_ilike("order_no", format!("%{order_no}%"));
        }
        if let Some(from) = self.created_from {
            query.where_cmp("created_at", CmpOp::Gte, from);
        }
        if let Some(to) = self.created_to {
            query.where_cmp("created_at", CmpOp::Lte, to);
        }
    }
}

#[derive(Clone)]
pub struct OrderRepository<S = PgStore> {
    engine: QueryEngine<S>,
}

impl<S: Store> OrderRepository<S> {
    pub fn new(engine: QueryEngine<S>) -> Self {
        Self { engine }
    }

    pub async fn list(
        &self,
        ctx: &QueryContext,
        req: &PagingRequest,
        filter: &OrderFilter,
    ) -> AppResult<(Vec<Order>, PageMetadata)> {
        let scope = |q: &mut SelectQuery| filter.apply(q);
        self.engine
            .get_list::<Order>(ctx, req, &ORDER_COLUMNS, Some(&scope))
            .await
    }

    pub async fn find_by_id(&self, ctx: &QueryContext, id: Uuid) -> AppResult<Option<Order>> {
        self.engine.get_by_pk::<Order>(ctx, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlValue;
    use crate::query::testing::{Call, RecordingStore};
    use serde_json::json;

    fn order_row(member_id: Uuid) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "order_no": "ORD-0001",
            "member_id": member_id,
            "status": "refund_requested",
            "created_at": "2024-05-01T08:30:00+00:00",
            "updated_at": "2024-05-01T08:30:00+00:00"
        })
    }

    #[tokio::test]
    async fn test_member_scope_precedes_client_search() {
        let member = Uuid::new_v4();
        let repo = OrderRepository::new(QueryEngine::new(RecordingStore::with_rows(vec![
            order_row(member),
        ])));
        let req = PagingRequest {
            search: Some("ORD-0001".into()),
            search_by: Some("order_no".into()),
            ..Default::default()
        };
        let filter = OrderFilter::default().for_member(member);

        let (orders, meta) = repo.list(&QueryContext::new(), &req, &filter).await.unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::RefundRequested);
        assert_eq!(meta.total, 1);

        let calls = repo.engine.store().calls();
        assert_eq!(calls[0].0, Call::Count);
        assert_eq!(
            calls[0].1.sql,
            "SELECT COUNT(*) AS total FROM \"orders\" AS t \
             WHERE \"member_id\" = $1 AND \"order_no\"::text = $2"
        );
        assert_eq!(calls[0].1.binds[0], SqlValue::Uuid(member));
    }

    #[tokio::test]
    async fn test_status_and_date_window() {
        let repo = OrderRepository::new(QueryEngine::new(RecordingStore::default()));
        let req = PagingRequest {
            start_date: Some(1_714_521_600),
            end_date: Some(1_714_608_000),
            ..Default::default()
        };
        let filter = OrderFilter::from_request(&req, Some(OrderStatus::Paid));

        repo.list(&QueryContext::new(), &req, &filter).await.unwrap();

        let calls = repo.engine.store().calls();
        assert_eq!(
            calls[0].1.sql,
            "SELECT COUNT(*) AS total FROM \"orders\" AS t \
             WHERE \"status\" = $1 AND \"created_at\" >= $2::timestamptz \
             AND \"created_at\" <= $3::timestamptz"
        );
        assert_eq!(calls[0].1.binds[0], SqlValue::Text("paid".into()));
        assert_eq!(repo.engine.store().kinds(), vec![Call::Count]);
    }

    #[tokio::test]
    async fn test_free_text_search_matches_order_no() {
        let repo = OrderRepository::new(QueryEngine::new(RecordingStore::default()));
        let req = PagingRequest {
            search: Some(" ORD-2024% ".into()),
            ..Default::default()
        };
        let filter = OrderFilter::from_request(&req, None);
        assert_eq!(filter.order_no.as_deref(), Some("ORD-2024"));

        repo.list(&QueryContext::new(), &req, &filter).await.unwrap();

        let calls = repo.engine.store().calls();
        assert_eq!(
            calls[0].1.sql,
            "SELECT COUNT(*) AS total FROM \"orders\" AS t WHERE \"order_no\" ILIKE $1"
        );
        assert_eq!(calls[0].1.binds, vec![SqlValue::Text("%ORD-2024%".into())]);
    }

    #[test]
    fn test_column_search_leaves_free_text_unset() {
        let req = PagingRequest {
            search: Some("ORD-2024".into()),
            search_by: Some("order_no".into()),
            ..Default::default()
        };
        assert_eq!(OrderFilter::from_request(&req, None).order_no, None);
    }

    #[test]
    fn test_non_positive_dates_are_ignored() {
        let req = PagingRequest {
            start_date: Some(0),
            end_date: Some(-5),
            ..Default::default()
        };
        let filter = OrderFilter::from_request(&req, None);
        assert_eq!(filter, OrderFilter::default());
    }
}
