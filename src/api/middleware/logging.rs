use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Instrument, Level, info_span};

use super::RequestId;

/// Logs each request and its outcome inside an `http_request` span.
///
/// Server errors log at `error`, client errors at `warn`, the rest at `info`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    );

    async move {
        tracing::debug!(query = request.uri().query().unwrap_or(""), "Request received");

        let start = Instant::now();
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        match level_for(status) {
            Level::ERROR => tracing::error!(status, duration_ms, "Response sent"),
            Level::WARN => tracing::warn!(status, duration_ms, "Response sent"),
            _ => tracing::info!(status, duration_ms, "Response sent"),
        }
        response
    }
    .instrument(span)
    .await
}

fn level_for(status: u16) -> Level {
    match status {
        500.. => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_status() {
        assert_eq!(level_for(200), Level::INFO);
        assert_eq!(level_for(304), Level::INFO);
        assert_eq!(level_for(404), Level::WARN);
        assert_eq!(level_for(503), Level::ERROR);
    }
}
