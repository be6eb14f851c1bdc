// SPDX-License-Identifier: MIT

//! Security headers middleware for the JSON API surface.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    // Session-bearing JSON responses must never be cached by intermediaries
    headers.insert("Cache-Control", HeaderValue::from_static("no-store"));

    response
}
