//! Database connection pool module.

mod pool;

pub use pool::{AsyncDbPool, establish_async_connection_pool, lazy_connection_pool};
