//! HTTP API layer: handlers, middleware, DTOs and the response envelope.

pub mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
