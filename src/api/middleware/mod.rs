//! Middleware for request ids, request logging and error envelopes.

mod error_handler;
mod logging;
mod request_id;

pub use error_handler::{ErrorDetail, error_to_code, error_to_status_code, global_error_handler};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
