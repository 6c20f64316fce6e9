//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between
//! repositories and handlers.

mod audit_log_service;
mod order_service;
mod prefix_service;

pub use audit_log_service::AuditLogService;
pub use order_service::OrderService;
pub use prefix_service::PrefixService;

use crate::query::PgStore;
use crate::repositories::Repositories;

/// Aggregates all services for use as Axum application state.
///
/// Cloning is cheap since the underlying pool uses `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub prefixes: PrefixService,
    pub orders: OrderService,
    pub audit_logs: AuditLogService,
}

impl Services {
    pub fn new(store: PgStore) -> Self {
        let repos = Repositories::new(store.clone());
        Self {
            prefixes: PrefixService::new(store, repos.prefixes, repos.audit_logs.clone()),
            orders: OrderService::new(repos.orders),
            audit_logs: AuditLogService::new(repos.audit_logs),
        }
    }
}
