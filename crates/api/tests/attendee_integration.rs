//! Integration tests for the public attendee flows.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    approve, create_event, create_ticket, get_request, json_request, register_attendee,
    register_organizer, send, setup,
};
use serde_json::json;

#[tokio::test]
async fn test_public_event_shows_remaining_and_organizer_phone() {
    let (_pool, app) = setup().await;
    let organizer = register_organizer(&app).await;
    let event = create_event(&app, &organizer, 3).await;
    create_ticket(&app, &event.code).await;

    // Codes from links are matched case-insensitively.
    let (status, body) = send(
        &app,
        get_request(&format!("/api/v1/public/events/{}", event.code.to_lowercase())),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], event.code);
    assert_eq!(body["tickets_remaining"], 2);
    assert_eq!(body["max_tickets"], 3);
    assert_eq!(body["organizer_phone"], organizer.phone);
}

#[tokio::test]
async fn test_public_event_unknown_code() {
    let (_pool, app) = setup().await;

    let (status, body) = send(&app, get_request("/api/v1/public/events/NOPE0000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_register_attendee_creates_pending_ticket() {
    let (_pool, app) = setup().await;
    let organizer = register_organizer(&app).await;
    let event = create_event(&app, &organizer, 3).await;

    let (status, body) = register_attendee(&app, &event.code, "Amara").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["attendee_name"], "Amara");
    assert_eq!(body["payment_reference"], "MPESA-QX12");
    assert_eq!(body["event_id"], event.id);
    assert!(body.get("checked_in_at").is_none());

    let code = body["code"].as_str().unwrap();
    assert!(code.starts_with(&format!("{}-", event.code)));
}

#[tokio::test]
async fn test_register_attendee_validation_and_unknown_event() {
    let (_pool, app) = setup().await;
    let organizer = register_organizer(&app).await;
    let event = create_event(&app, &organizer, 3).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/v1/public/events/{}/tickets", event.code),
            json!({ "name": "   ", "phone": "0711000111" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = register_attendee(&app, "NOPE0000", "Bo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_tickets_reserve_capacity() {
    let (_pool, app) = setup().await;
    let organizer = register_organizer(&app).await;
    let event = create_event(&app, &organizer, 2).await;

    create_ticket(&app, &event.code).await;
    create_ticket(&app, &event.code).await;

    let (status, body) = register_attendee(&app, &event.code, "Late Comer").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "capacity_full");
    assert_eq!(body["message"], "Event is full (2 tickets)");
}

#[tokio::test]
async fn test_ticket_views_follow_status() {
    let (_pool, app) = setup().await;
    let organizer = register_organizer(&app).await;
    let event = create_event(&app, &organizer, 3).await;
    let (ticket_id, ticket_code) = create_ticket(&app, &event.code).await;

    let (status, pending) = send(
        &app,
        get_request(&format!("/api/v1/public/tickets/{}/pending", ticket_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["ticket"]["id"], ticket_id);
    assert_eq!(pending["organizer_phone"], organizer.phone);
    assert_eq!(pending["event"]["code"], event.code);

    let (_, view) = send(&app, get_request(&format!("/api/v1/public/tickets/{}", ticket_id))).await;
    assert_eq!(view["status"], "pending");
    assert!(view.get("qr_data").is_none());

    approve(&app, &organizer, &ticket_id).await;

    let (status, view) = send(&app, get_request(&format!("/api/v1/public/tickets/{}", ticket_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "approved");
    assert_eq!(
        view["qr_data"],
        format!("https://gatepass.test/verify/{}", ticket_code)
    );
}

#[tokio::test]
async fn test_ticket_view_unknown_id() {
    let (_pool, app) = setup().await;

    let (status, _) = send(
        &app,
        get_request(&format!("/api/v1/public/tickets/{}", uuid::Uuid::new_v4())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
