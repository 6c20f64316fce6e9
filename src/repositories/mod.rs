//! Repository layer for data access operations.
//!
//! Each repository pairs a record type with the column allow-list its list
//! endpoint exposes. Repositories are generic over [`Store`](crate::query::Store)
//! so the same code runs on the pool and inside a transaction.

mod audit_log_repo;
mod order_repo;
mod prefix_repo;

pub use audit_log_repo::{AUDIT_LOG_COLUMNS, AuditLogRepository};
pub use order_repo::{ORDER_COLUMNS, OrderFilter, OrderRepository};
pub use prefix_repo::{PREFIX_COLUMNS, PrefixRepository};

use crate::query::{PgStore, QueryEngine};

/// Pool-backed repositories, cloned into the services.
#[derive(Clone)]
pub struct Repositories {
    pub prefixes: PrefixRepository,
    pub orders: OrderRepository,
    pub audit_logs: AuditLogRepository,
}

impl Repositories {
    pub fn new(store: PgStore) -> Self {
        let engine = QueryEngine::new(store);
        Self {
            prefixes: PrefixRepository::new(engine.clone()),
            orders: OrderRepository::new(engine.clone()),
            audit_logs: AuditLogRepository::new(engine),
        }
    }
}
