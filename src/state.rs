//! Application state shared by every request handler.

use std::time::Duration;

use crate::query::{PgStore, QueryContext};
use crate::services::Services;

/// Cloning is cheap: services and the store share one `Arc`-backed pool.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct store access for health checks
    pub store: PgStore,
    /// Upper bound for each engine call, zero for none
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(store: PgStore, query_timeout: Duration) -> Self {
        Self {
            services: Services::new(store.clone()),
            store,
            query_timeout,
        }
    }

    /// Fresh context for one request's engine calls.
    pub fn query_context(&self) -> QueryContext {
        QueryContext::new().with_timeout(self.query_timeout)
    }
}
