//! HTTP request handlers, one module per resource.

pub mod audit_logs;
pub mod health;
pub mod orders;
pub mod prefixes;
