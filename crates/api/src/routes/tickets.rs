//! Organizer ticket moderation: approve after payment, or reject.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::Ticket;
use domain::services::TicketLifecycle;
use persistence::repositories::PgTicketStore;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerAuth;
use crate::middleware::metrics::{record_ticket_approved, record_ticket_rejected};

/// POST /api/v1/tickets/:ticket_id/approve
pub async fn approve_ticket(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Ticket>, ApiError> {
    let lifecycle = TicketLifecycle::new(PgTicketStore::new(state.pool.clone()));

    let ticket = lifecycle
        .approve_ticket(ticket_id, auth.organizer_id)
        .await
        .map_err(|e| {
            tracing::info!(ticket_id = %ticket_id, outcome = e.tag(), "Approve refused");
            ApiError::from(e)
        })?;

    record_ticket_approved();
    Ok(Json(ticket))
}

/// Deletes the ticket and returns its last state.
///
/// POST /api/v1/tickets/:ticket_id/reject
pub async fn reject_ticket(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<Ticket>, ApiError> {
    let lifecycle = TicketLifecycle::new(PgTicketStore::new(state.pool.clone()));

    let removed = lifecycle
        .reject_ticket(ticket_id, auth.organizer_id)
        .await
        .map_err(|e| {
            tracing::info!(ticket_id = %ticket_id, outcome = e.tag(), "Reject refused");
            ApiError::from(e)
        })?;

    record_ticket_rejected();
    Ok(Json(removed))
}
