//! Database metrics collection.
//!
//! Query latency is recorded per query name and outcome, pool gauges on
//! demand.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Whether a timed query returned `Ok` or `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Ok,
    Error,
}

impl QueryOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryOutcome::Ok => "ok",
            QueryOutcome::Error => "error",
        }
    }

    fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            QueryOutcome::Ok
        } else {
            QueryOutcome::Error
        }
    }
}

/// Record one query's duration, and count it if it failed.
pub fn record_query_duration(query_name: &str, outcome: QueryOutcome, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string(),
        "outcome" => outcome.as_str()
    )
    .record(duration_secs);

    if outcome == QueryOutcome::Error {
        counter!("database_query_errors_total", "query" => query_name.to_string()).increment(1);
    }
}

/// Record database connection pool gauges.
///
/// Called on every scrape of the metrics endpoint.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times one repository call.
///
/// ```ignore
/// let timer = QueryTimer::new("find_ticket_by_code");
/// let result = sqlx::query_as::<_, TicketEntity>(...).fetch_optional(&pool).await;
/// timer.finish(result)
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time labelled with the result's outcome and
    /// hands the result back.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        let outcome = QueryOutcome::of(&result);
        record_query_duration(
            self.query_name,
            outcome,
            self.start.elapsed().as_secs_f64(),
        );
        result
    }
}
