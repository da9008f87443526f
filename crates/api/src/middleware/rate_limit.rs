//! Rate limiting middleware.
//!
//! Throttles the unauthenticated attendee endpoints (self-registration and
//! door verification) per client address using governor's GCRA limiter.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Bucket shared by requests whose client address cannot be determined.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Checks between two sweeps of idle client entries.
const PRUNE_INTERVAL: u64 = 1024;

/// One GCRA cell per client address.
pub struct RateLimiterState {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
    quota: Quota,
    trust_forwarded_for: bool,
    checks: AtomicU64,
}

impl RateLimiterState {
    /// Returns `None` when the limit is 0, which disables throttling.
    ///
    /// With `trust_forwarded_for` the first `X-Forwarded-For` hop names the
    /// client. Only enable it behind a proxy that overwrites the header.
    pub fn new(rate_limit_per_minute: u32, trust_forwarded_for: bool) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self::with_quota(Quota::per_minute(per_minute), trust_forwarded_for))
    }

    fn with_quota(quota: Quota, trust_forwarded_for: bool) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
            quota,
            trust_forwarded_for,
            checks: AtomicU64::new(0),
        }
    }

    /// Returns `Err(retry_after_secs)` when the client is over quota.
    pub fn check(&self, client: IpAddr) -> Result<(), u64> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PRUNE_INTERVAL == PRUNE_INTERVAL - 1 {
            self.prune();
        }

        self.limiter.check_key(&client).map_err(|not_until| {
            let wait_time = not_until.wait_time_from(DefaultClock::default().now());
            wait_time.as_secs().max(1)
        })
    }

    /// Drops clients whose quota has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    fn active_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Identify the caller: the peer address, or the first `X-Forwarded-For`
    /// hop when the proxy is trusted.
    fn client_key(&self, req: &Request<Body>) -> IpAddr {
        if self.trust_forwarded_for {
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse::<IpAddr>().ok());

            if let Some(ip) = forwarded {
                return ip;
            }
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .unwrap_or(UNKNOWN_CLIENT)
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("quota", &self.quota)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("active_clients", &self.active_clients())
            .finish()
    }
}

/// Middleware applied as a route layer on the public write endpoints.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let client = rate_limiter.client_key(&req);
        if let Err(retry_after) = rate_limiter.check(client) {
            tracing::warn!(client = %client, retry_after, "Public rate limit exceeded");
            return rate_limited_response(retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(retry_after: u64) -> Response {
    let mut response = ApiError::RateLimited.into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}
