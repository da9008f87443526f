//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// Env var enabling `Strict-Transport-Security`; only set behind TLS.
pub const HSTS_ENV_VAR: &str = "GP__SECURITY__HSTS_ENABLED";

fn hsts_enabled() -> bool {
    std::env::var(HSTS_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Middleware that adds security headers to all responses.
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `X-XSS-Protection: 1; mode=block`
/// - `Referrer-Policy: no-referrer`, since verification URLs carry the ticket code
/// - `Cache-Control: no-store` on ticket and verification responses
/// - `Strict-Transport-Security` when [`HSTS_ENV_VAR`] is `true`
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let carries_ticket = {
        let path = req.uri().path();
        path.starts_with("/api/v1/public/tickets") || path.starts_with("/api/v1/verify")
    };

    let mut response = next.run(req).await;
    let out = response.headers_mut();

    out.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    out.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    out.insert(
        header::HeaderName::from_static(headers::X_XSS_PROTECTION),
        HeaderValue::from_static("1; mode=block"),
    );
    out.insert(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"));

    if carries_ticket {
        out.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    if hsts_enabled() {
        out.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

/// Security header names as constants.
pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const X_XSS_PROTECTION: &str = "x-xss-protection";
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_headers_added_to_response() {
        let app = Router::new()
            .route("/api/v1/verify/:code", get(|| async { "ok" }))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/verify/SPRING26-0A1B2C3D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let sent = response.headers();
        assert_eq!(sent.get(headers::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(sent.get(headers::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(sent.get(headers::X_XSS_PROTECTION).unwrap(), "1; mode=block");
        assert_eq!(sent.get(header::REFERRER_POLICY).unwrap(), "no-referrer");
        assert_eq!(sent.get(header::CACHE_CONTROL).unwrap(), "no-store");
    }

    #[tokio::test]
    async fn test_no_store_only_on_ticket_routes() {
        let app = Router::new()
            .route("/api/health", get(|| async { "ok" }))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
        assert!(response.headers().get(headers::X_FRAME_OPTIONS).is_some());
    }

    #[test]
    fn test_hsts_env_var_name() {
        assert_eq!(HSTS_ENV_VAR, "GP__SECURITY__HSTS_ENABLED");
    }
}
