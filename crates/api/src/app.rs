use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{attendee, auth, events, health, tickets, verify};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// `None` when public rate limiting is disabled.
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let rate_limiter = RateLimiterState::new(
        config.security.public_rate_limit_per_minute,
        config.security.trust_forwarded_for,
    )
    .map(Arc::new);

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Organizer routes authenticate through the OrganizerAuth extractor.
    let organizer_routes = Router::new()
        .route("/api/v1/dashboard", get(events::dashboard))
        .route("/api/v1/events", post(events::create_event))
        .route("/api/v1/events/:event_id", get(events::event_details))
        .route(
            "/api/v1/tickets/:ticket_id/approve",
            post(tickets::approve_ticket),
        )
        .route(
            "/api/v1/tickets/:ticket_id/reject",
            post(tickets::reject_ticket),
        );

    // Unauthenticated writes: registration and door verification.
    let throttled_routes = Router::new()
        .route(
            "/api/v1/public/events/:event_code/tickets",
            post(attendee::register_attendee),
        )
        .route("/api/v1/verify", post(verify::verify_form))
        .route("/api/v1/verify/:ticket_code", get(verify::verify_scan))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route(
            "/api/v1/public/events/:event_code",
            get(attendee::public_event),
        )
        .route(
            "/api/v1/public/tickets/:ticket_id",
            get(attendee::view_ticket),
        )
        .route(
            "/api/v1/public/tickets/:ticket_id/pending",
            get(attendee::ticket_pending),
        );

    Router::new()
        .merge(public_routes)
        .merge(throttled_routes)
        .merge(organizer_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
