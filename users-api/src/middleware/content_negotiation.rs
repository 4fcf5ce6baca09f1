//! `Accept` header enforcement
//!
//! The service only produces JSON. A request whose `Accept` header admits
//! none of `application/json`, `application/*` or `*/*` is answered with
//! `406 Not Acceptable` before it reaches a handler. A missing or unreadable
//! header accepts anything.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::handlers::{ApiError, ApiOperation};

/// Media ranges that admit a JSON response
const JSON_RANGES: &[&str] = &["application/json", "application/*", "*/*"];

/// Returns `true` if the `Accept` headers admit `application/json`
pub fn accepts_json(headers: &HeaderMap) -> bool {
    let mut values = headers.get_all(header::ACCEPT).iter().peekable();
    if values.peek().is_none() {
        return true;
    }

    let mut saw_range = false;
    for value in values {
        let Ok(value) = value.to_str() else {
            return true;
        };
        for range in value.split(',') {
            let mut parts = range.split(';');
            let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
            if media.is_empty() {
                continue;
            }
            saw_range = true;

            let refused = parts.any(|param| {
                let param = param.trim();
                param
                    .strip_prefix("q=")
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .is_some_and(|q| q <= 0.0)
            });
            if !refused && JSON_RANGES.contains(&media.as_str()) {
                return true;
            }
        }
    }

    !saw_range
}

/// Middleware rejecting requests that cannot accept JSON
pub async fn require_json(request: Request, next: Next) -> Response {
    if accepts_json(request.headers()) {
        return next.run(request).await;
    }

    tracing::debug!(
        accept = ?request.headers().get(header::ACCEPT),
        path = %request.uri().path(),
        "no acceptable representation"
    );
    let operation = ApiOperation::for_request(request.method(), request.uri().path());
    ApiError::not_acceptable(operation, "Only application/json representations are available")
        .into_response()
}
