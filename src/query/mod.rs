//! Generic paginated list and query engine.
//!
//! Turns untrusted paging, search and sort input into parameterized
//! statements against any [`Record`] table, and runs them through a [`Store`].

mod builder;
mod context;
mod engine;
mod paging;
mod pg_store;
mod store;
mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{CmpOp, Condition, Filter, SelectQuery, SortDirection, UpdateQuery};
pub use context::QueryContext;
pub use engine::{Customizer, QueryEngine};
pub use paging::{
    ColumnAllowList, MAX_PAGE_SIZE, MIN_PAGE_SIZE, MIN_SEARCH_LEN, PageMetadata, PagingError,
    PagingRequest, remove_malicious,
};
pub use pg_store::{PgStore, TxStore};
pub use store::{Record, Store};
pub use value::{Ident, SqlValue, Statement};
