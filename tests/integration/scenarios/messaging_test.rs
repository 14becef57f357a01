//! Trip chat scenario tests

use assert_matches::assert_matches;

use campbar::models::SendMessageRequest;
use campbar::CampBarError;

use crate::helpers::*;

fn text(value: &str) -> SendMessageRequest {
    SendMessageRequest {
        text: value.to_string(),
    }
}

#[tokio::test]
async fn test_members_chat_in_order() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE]).await;

    ctx.engine.messaging.send(trip.id, ORGANIZER, text("Meet at 7")).await.unwrap();
    let reply = ctx.engine.messaging.send(trip.id, ALICE, text("  I'll bring coffee ")).await.unwrap();
    assert_eq!(reply.text, "I'll bring coffee");
    assert_eq!(reply.author_id, ALICE);

    let log: Vec<_> = ctx
        .engine
        .messaging
        .list(trip.id, ALICE)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(log, vec!["Meet at 7", "I'll bring coffee"]);
}

#[tokio::test]
async fn test_message_validation() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;

    assert_matches!(
        ctx.engine.messaging.send(trip.id, ORGANIZER, text("   ")).await,
        Err(CampBarError::Validation(_))
    );
    let too_long = "x".repeat(ctx.settings.messaging.max_message_length + 1);
    assert_matches!(
        ctx.engine.messaging.send(trip.id, ORGANIZER, text(&too_long)).await,
        Err(CampBarError::Validation(_))
    );
}

#[tokio::test]
async fn test_chat_private_to_members() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.engine.messaging.send(trip.id, ORGANIZER, text("Route is up")).await.unwrap();

    assert_matches!(
        ctx.engine.messaging.send(trip.id, OUTSIDER, text("hello?")).await,
        Err(CampBarError::Forbidden(_))
    );
    assert_matches!(
        ctx.engine.messaging.list(trip.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );

    let outsider_view = ctx.engine.trips.get_detail(trip.id, OUTSIDER).await.unwrap();
    assert!(outsider_view.messages.is_none());
    let member_view = ctx.engine.trips.get_detail(trip.id, ORGANIZER).await.unwrap();
    assert_eq!(member_view.messages.map(|m| m.len()), Some(1));
}

#[tokio::test]
async fn test_chat_closed_on_terminal_trip() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.engine.messaging.send(trip.id, ORGANIZER, text("See you")).await.unwrap();
    ctx.engine.trips.cancel(trip.id, ORGANIZER).await.unwrap();

    assert_matches!(
        ctx.engine.messaging.send(trip.id, ORGANIZER, text("Anyone?")).await,
        Err(CampBarError::TripNotActive { .. })
    );
    assert_eq!(ctx.engine.messaging.list(trip.id, ORGANIZER).await.unwrap().len(), 1);
}
