//! Response envelope and key-casing transcoder.
//!
//! Every handler returns an [`ApiResponse`], which is serialized once and then
//! has its keys rewritten to the process-wide [`NamingConvention`].

mod envelope;
pub mod naming;
mod transcode;

pub use envelope::{ApiResponse, MSG_CREATED, MSG_SUCCESS, ResponseStatus};
pub use naming::{NamingConvention, TranscodeError};
pub use transcode::{to_camel_key, to_json, to_snake_key, transcode};
