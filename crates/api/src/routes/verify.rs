//! Door verification: one scan or typed code checks a ticket in.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{
    Event, Ticket, VerificationOutcome, VerificationStatus, VerifyTicketRequest,
};
use domain::services::TicketLifecycle;
use persistence::repositories::{EventRepository, PgTicketStore};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_ticket_verification;

/// Every outcome, including `invalid`, answers 200 with this body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyResponse {
    pub status: VerificationStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
}

impl VerifyResponse {
    fn new(outcome: VerificationOutcome, event: Option<Event>) -> Self {
        Self {
            status: outcome.status(),
            message: outcome.message(),
            ticket: outcome.into_ticket(),
            event,
        }
    }
}

async fn verify(state: &AppState, raw_code: &str) -> Result<VerifyResponse, ApiError> {
    let lifecycle = TicketLifecycle::new(PgTicketStore::new(state.pool.clone()));
    let outcome = lifecycle.verify_and_check_in(raw_code).await?;
    record_ticket_verification(outcome.status());

    let event = match outcome.ticket() {
        Some(ticket) => EventRepository::new(state.pool.clone())
            .find_by_id(ticket.event_id)
            .await?
            .map(Event::from),
        None => None,
    };

    Ok(VerifyResponse::new(outcome, event))
}

/// Code typed into the door form.
///
/// POST /api/v1/verify
pub async fn verify_form(
    State(state): State<AppState>,
    Json(request): Json<VerifyTicketRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    Ok(Json(verify(&state, &request.ticket_code).await?))
}

/// Code taken from a scanned QR link.
///
/// GET /api/v1/verify/:ticket_code
pub async fn verify_scan(
    State(state): State<AppState>,
    Path(ticket_code): Path<String>,
) -> Result<Json<VerifyResponse>, ApiError> {
    Ok(Json(verify(&state, &ticket_code).await?))
}
