//! Public attendee flows: event page, self-registration and ticket views.
//!
//! None of these routes require a login. A ticket ID or code is enough to
//! see the ticket, so they are only handed to the attendee who registered.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Event, PublicEventInfo, RegisterAttendeeRequest, Ticket, TicketStatus};
use domain::services::TicketLifecycle;
use persistence::repositories::{EventRepository, PgTicketStore, TicketRepository};
use serde::Serialize;
use shared::validation::normalize_event_code;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_ticket_registered;
use crate::routes::verification_url;

/// Ticket awaiting payment confirmation, with the phone to pay to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TicketPendingResponse {
    pub status: TicketStatus,
    pub ticket: Ticket,
    pub event: PublicEventInfo,
    pub organizer_phone: String,
}

/// An approved or used ticket ready to show at the door.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TicketPassResponse {
    pub status: TicketStatus,
    pub ticket: Ticket,
    pub event: PublicEventInfo,
    /// Text to render as the ticket's QR code.
    pub qr_data: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TicketViewResponse {
    Pending(TicketPendingResponse),
    Pass(TicketPassResponse),
}

/// GET /api/v1/public/events/:event_code
pub async fn public_event(
    State(state): State<AppState>,
    Path(event_code): Path<String>,
) -> Result<Json<PublicEventInfo>, ApiError> {
    let row = EventRepository::new(state.pool.clone())
        .find_public_by_code(&normalize_event_code(&event_code))
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let event: Event = row.event.into();
    Ok(Json(PublicEventInfo::new(
        &event,
        row.ticket_count,
        row.organizer_phone,
    )))
}

/// Registers an attendee; the ticket starts out pending.
///
/// POST /api/v1/public/events/:event_code/tickets
pub async fn register_attendee(
    State(state): State<AppState>,
    Path(event_code): Path<String>,
    Json(request): Json<RegisterAttendeeRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    request.validate()?;

    let lifecycle = TicketLifecycle::new(PgTicketStore::new(state.pool.clone()));
    let ticket = lifecycle
        .create_ticket(&normalize_event_code(&event_code), request.into())
        .await?;

    record_ticket_registered();
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn load_ticket_with_event(
    state: &AppState,
    ticket_id: Uuid,
) -> Result<(Ticket, PublicEventInfo), ApiError> {
    let ticket: Ticket = TicketRepository::new(state.pool.clone())
        .find_by_id(ticket_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?
        .into();

    let row = EventRepository::new(state.pool.clone())
        .find_public_by_id(ticket.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

    let event: Event = row.event.into();
    let info = PublicEventInfo::new(&event, row.ticket_count, row.organizer_phone);
    Ok((ticket, info))
}

fn pending_view(ticket: Ticket, event: PublicEventInfo) -> TicketPendingResponse {
    TicketPendingResponse {
        status: ticket.status,
        organizer_phone: event.organizer_phone.clone(),
        ticket,
        event,
    }
}

/// GET /api/v1/public/tickets/:ticket_id/pending
pub async fn ticket_pending(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketPendingResponse>, ApiError> {
    let (ticket, event) = load_ticket_with_event(&state, ticket_id).await?;
    Ok(Json(pending_view(ticket, event)))
}

/// Pending tickets get the pending view; others get the QR payload.
///
/// GET /api/v1/public/tickets/:ticket_id
pub async fn view_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketViewResponse>, ApiError> {
    let (ticket, event) = load_ticket_with_event(&state, ticket_id).await?;

    let view = match ticket.status {
        TicketStatus::Pending => TicketViewResponse::Pending(pending_view(ticket, event)),
        TicketStatus::Approved | TicketStatus::Used => {
            TicketViewResponse::Pass(TicketPassResponse {
                status: ticket.status,
                qr_data: verification_url(&state.config, &ticket.code),
                ticket,
                event,
            })
        }
    };

    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ticket(status: TicketStatus) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            code: "SPRING26-0A1B2C3D".to_string(),
            attendee_name: "Amara".to_string(),
            attendee_phone: "0711000111".to_string(),
            payment_reference: None,
            status,
            checked_in_at: None,
            created_at: Utc::now(),
        }
    }

    fn event_info() -> PublicEventInfo {
        PublicEventInfo {
            code: "SPRING26".to_string(),
            name: "Spring Gala".to_string(),
            date: "2026-11-01".to_string(),
            venue: "Main Hall".to_string(),
            ticket_price: 500,
            max_tickets: 2,
            tickets_remaining: 1,
            organizer_phone: "0722000222".to_string(),
        }
    }

    #[test]
    fn test_pending_view_carries_organizer_phone() {
        let view = pending_view(ticket(TicketStatus::Pending), event_info());
        let json = serde_json::to_value(TicketViewResponse::Pending(view)).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["organizer_phone"], "0722000222");
        assert!(json.get("qr_data").is_none());
    }

    #[test]
    fn test_pass_view_serializes_flat() {
        let view = TicketViewResponse::Pass(TicketPassResponse {
            status: TicketStatus::Approved,
            ticket: ticket(TicketStatus::Approved),
            event: event_info(),
            qr_data: "http://localhost:8080/verify/SPRING26-0A1B2C3D".to_string(),
        });
        let json = serde_json::to_value(view).unwrap();

        assert_eq!(json["status"], "approved");
        assert_eq!(json["ticket"]["code"], "SPRING26-0A1B2C3D");
        assert!(json["qr_data"].as_str().unwrap().ends_with("/verify/SPRING26-0A1B2C3D"));
    }
}
