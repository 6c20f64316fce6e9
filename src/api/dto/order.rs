use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

/// Order-specific list filter, alongside the shared paging parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    /// Only orders in this state
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct OrderResponse {
    #[serde(rename = "id")]
    pub id: Uuid,
    #[schema(example = "ORD-20240501-0001")]
    pub order_no: String,
    pub member_id: Uuid,
    pub status: OrderStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_no: order.order_no,
            member_id: order.member_id,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
