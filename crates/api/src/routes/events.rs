//! Organizer dashboard and event management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CreateEventRequest, Event, EventSummary, Organizer, Ticket, TicketCounts, TicketsByStatus,
};
use persistence::repositories::{EventInput, EventRepository, OrganizerRepository, TicketRepository};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OrganizerAuth;
use crate::routes::registration_url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardResponse {
    pub organizer: Organizer,
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventResponse {
    pub event: Event,
    pub registration_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventDetailsResponse {
    pub event: Event,
    pub ticket_counts: TicketCounts,
    pub tickets_remaining: i64,
    /// Newest first.
    pub pending: Vec<Ticket>,
    /// Newest first.
    pub approved: Vec<Ticket>,
    /// Most recent check-in first.
    pub used: Vec<Ticket>,
    pub registration_url: String,
}

/// Organizer profile plus their events, newest first.
///
/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: OrganizerAuth,
) -> Result<Json<DashboardResponse>, ApiError> {
    let organizer = OrganizerRepository::new(state.pool.clone())
        .find_by_id(auth.organizer_id)
        .await?
        // Token outlived the account.
        .ok_or_else(|| ApiError::Unauthorized("Organizer account not found".to_string()))?;

    let events = EventRepository::new(state.pool.clone())
        .list_for_organizer_with_counts(auth.organizer_id)
        .await?
        .into_iter()
        .map(|row| {
            let counts = row.counts();
            EventSummary::new(row.event.into(), counts)
        })
        .collect();

    Ok(Json(DashboardResponse {
        organizer: organizer.into(),
        events,
    }))
}

/// Create an event with a fresh shareable code.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    request.validate()?;

    let event: Event = EventRepository::new(state.pool.clone())
        .create_with_unique_code(
            &EventInput {
                organizer_id: auth.organizer_id,
                name: request.name.trim(),
                date: request.date.trim(),
                venue: request.venue.trim(),
                max_tickets: request.max_tickets,
                ticket_price: request.ticket_price,
            },
            shared::codes::generate_event_code,
        )
        .await?
        .into();

    tracing::info!(
        event_id = %event.id,
        event_code = %event.code,
        organizer_id = %auth.organizer_id,
        max_tickets = event.max_tickets,
        "Event created"
    );

    let registration_url = registration_url(&state.config, &event.code);
    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event,
            registration_url,
        }),
    ))
}

/// Event with its tickets grouped by status. Owner only.
///
/// GET /api/v1/events/:event_id
pub async fn event_details(
    State(state): State<AppState>,
    auth: OrganizerAuth,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetailsResponse>, ApiError> {
    let event: Event = EventRepository::new(state.pool.clone())
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?
        .into();

    if !event.is_owned_by(auth.organizer_id) {
        tracing::warn!(
            event_id = %event_id,
            organizer_id = %auth.organizer_id,
            "Event details requested by non-owner"
        );
        return Err(ApiError::Forbidden("You do not own this event".to_string()));
    }

    // One read, so the groups and counts agree with each other.
    let tickets = TicketsByStatus::from_tickets(
        TicketRepository::new(state.pool.clone())
            .list_for_event(event_id)
            .await?
            .into_iter()
            .map(Ticket::from),
    );
    let ticket_counts = tickets.counts();

    Ok(Json(EventDetailsResponse {
        tickets_remaining: event.tickets_remaining(ticket_counts.total()),
        registration_url: registration_url(&state.config, &event.code),
        ticket_counts,
        pending: tickets.pending,
        approved: tickets.approved,
        used: tickets.used,
        event,
    }))
}
