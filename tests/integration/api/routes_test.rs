//! Route-level tests: authentication, status codes and wire format

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::send;
use crate::helpers::*;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let (status, headers, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_requests_need_a_valid_token() {
    let ctx = TestContext::new();
    let app = ctx.router();

    let (status, _, body) = send(&app, Method::GET, "/trips", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["kind"], "unauthorized");

    let (status, _, _) = send(&app, Method::GET, "/trips", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = ctx.token(ALICE);
    let (status, _, body) = send(&app, Method::GET, "/trips", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_trip_journey_over_http() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let organizer = ctx.token(ORGANIZER);
    let alice = ctx.token(ALICE);
    let bob = ctx.token(BOB);

    let (status, _, trip) = send(
        &app,
        Method::POST,
        "/trips",
        Some(&organizer),
        Some(json!({
            "title": "Velika planina",
            "destination": "Kamnik Alps",
            "difficulty": "easy",
            "maxParticipants": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trip["status"], "planning");
    assert_eq!(trip["currentParticipants"], 1);
    assert_eq!(trip["organizerId"], ORGANIZER);
    let trip_id = trip["id"].as_i64().unwrap();

    let join = format!("/trips/{}/join", trip_id);
    let (status, _, participant) = send(&app, Method::POST, &join, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(participant["status"], "interested");

    let (status, _, body) = send(&app, Method::POST, &join, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");
    assert_eq!(body["error"]["message"], "This trip is full");

    let (status, _, option) = send(
        &app,
        Method::POST,
        &format!("/trips/{}/dates", trip_id),
        Some(&organizer),
        Some(json!({ "startDate": "2026-06-12", "endDate": "2026-06-14" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let option_id = option["id"].as_i64().unwrap();

    let vote = format!("/trips/{}/dates/{}/vote", trip_id, option_id);
    let (status, _, summary) = send(&app, Method::POST, &vote, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["voteCount"], 1);

    let (status, _, body) = send(&app, Method::POST, &vote, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "forbidden");

    let (status, _, confirmed) = send(
        &app,
        Method::POST,
        &format!("/trips/{}/dates/{}/confirm", trip_id, option_id),
        Some(&organizer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");
    assert_eq!(confirmed["startDate"], "2026-06-12");
    assert_eq!(confirmed["datesConfirmed"], true);

    let (status, _, body) = send(&app, Method::POST, &vote, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "invalid_state");

    let (status, _, detail) = send(
        &app,
        Method::GET,
        &format!("/trips/{}", trip_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["participants"].as_array().unwrap().len(), 2);
    assert!(detail.get("messages").is_none());

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/trips/{}/leave", trip_id),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_sos_over_http() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE]).await;
    let alice = ctx.token(ALICE);
    let organizer = ctx.token(ORGANIZER);

    let (status, _, alert) = send(
        &app,
        Method::POST,
        &format!("/trips/{}/sos", trip.id),
        Some(&alice),
        Some(json!({
            "location": { "latitude": 46.25, "longitude": 13.58, "accuracy": 20.0 },
            "category": "medical",
            "batteryLevel": 18
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alert["category"], "medical");
    assert_eq!(alert["resolved"], false);
    let alert_id = alert["id"].as_i64().unwrap();

    let (status, _, active) = send(
        &app,
        Method::GET,
        &format!("/trips/{}/sos/active", trip.id),
        Some(&organizer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["pollIntervalSeconds"], 3);
    assert_eq!(active["alerts"][0]["id"], alert_id);

    let resolve = format!("/trips/{}/sos/{}/resolve", trip.id, alert_id);
    let (status, _, resolved) = send(&app, Method::POST, &resolve, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["resolvedBy"], ORGANIZER);

    let (status, _, _) = send(&app, Method::POST, &resolve, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_status_codes_for_common_failures() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let organizer = ctx.token(ORGANIZER);

    let (status, _, body) = send(&app, Method::GET, "/trips/999", Some(&organizer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["kind"], "not_found");

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/trips",
        Some(&organizer),
        Some(json!({ "title": "Solo", "destination": "Nowhere", "maxParticipants": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "validation_error");

    let trip = ctx.create_trip(ORGANIZER, 4).await;
    let (status, _, body) = send(
        &app,
        Method::PATCH,
        &format!("/trips/{}/status", trip.id),
        Some(&organizer),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "invalid_state");

    let (status, _, cancelled) = send(
        &app,
        Method::DELETE,
        &format!("/trips/{}", trip.id),
        Some(&organizer),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
}

#[tokio::test]
async fn test_malformed_input_uses_error_envelope() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let organizer = ctx.token(ORGANIZER);

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/trips",
        Some(&organizer),
        Some(json!({ "destination": "Bohinj", "maxParticipants": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "validation_error");
    assert!(!body["error"]["message"].as_str().unwrap().contains("title"));

    let (status, _, body) = send(&app, Method::GET, "/trips/abc", Some(&organizer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "validation_error");

    let trip = ctx.create_trip(ORGANIZER, 4).await;
    let (status, _, body) = send(
        &app,
        Method::POST,
        &format!("/trips/{}/dates", trip.id),
        Some(&organizer),
        Some(json!({ "startDate": "2026-06-12" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, _, body) = send(&app, Method::GET, "/trips?limit=many", Some(&organizer), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["kind"], "validation_error");
}

#[tokio::test]
async fn test_non_member_actions_are_forbidden() {
    let ctx = TestContext::new();
    let app = ctx.router();
    let outsider = ctx.token(OUTSIDER);
    let trip = ctx.create_trip(ORGANIZER, 4).await;

    let (status, _, body) = send(
        &app,
        Method::DELETE,
        &format!("/trips/{}/leave", trip.id),
        Some(&outsider),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "forbidden");

    let (status, _, body) = send(
        &app,
        Method::POST,
        &format!("/trips/{}/participation/confirm", trip.id),
        Some(&outsider),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["kind"], "forbidden");
}
