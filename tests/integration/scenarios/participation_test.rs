//! Participation scenario tests: joining, leaving and capacity

use assert_matches::assert_matches;

use campbar::models::{CreateGearRequest, ParticipantStatus, TripStatus};
use campbar::CampBarError;

use crate::helpers::*;

#[tokio::test]
async fn test_organizer_holds_first_slot() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;

    assert_eq!(trip.status, TripStatus::Planning);
    assert_eq!(trip.current_participants, 1);
    let organizer = ctx.participant(trip.id, ORGANIZER).await.unwrap();
    assert_eq!(organizer.status, ParticipantStatus::Confirmed);
}

#[tokio::test]
async fn test_join_takes_a_slot_as_interested() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;

    let participant = ctx.engine.participation.join(trip.id, ALICE).await.unwrap();
    assert_eq!(participant.status, ParticipantStatus::Interested);
    assert!(participant.ticket_ref.is_none());
    assert_eq!(ctx.trip(trip.id, ALICE).await.current_participants, 2);

    let again = ctx.engine.participation.join(trip.id, ALICE).await;
    assert_matches!(again, Err(CampBarError::AlreadyParticipant { user_id: ALICE, .. }));
    assert_eq!(ctx.trip(trip.id, ALICE).await.current_participants, 2);
}

#[tokio::test]
async fn test_join_full_trip_rejected() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 2).await;
    ctx.join_all(trip.id, &[ALICE]).await;

    let result = ctx.engine.participation.join(trip.id, BOB).await;
    assert_matches!(result, Err(CampBarError::TripFull { .. }));
    assert!(ctx.participant(trip.id, BOB).await.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_joins_never_overfill() {
    let ctx = TestContext::new();
    let trip_id = ctx.create_trip(ORGANIZER, 2).await.id;

    let first = {
        let engine = ctx.engine.clone();
        tokio::spawn(async move { engine.participation.join(trip_id, BOB).await })
    };
    let second = {
        let engine = ctx.engine.clone();
        tokio::spawn(async move { engine.participation.join(trip_id, CAROL).await })
    };
    let results = vec![first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(CampBarError::TripFull { .. }))));
    assert_eq!(ctx.trip(trip_id, ORGANIZER).await.current_participants, 2);
}

#[tokio::test]
async fn test_join_missing_or_closed_trip() {
    let ctx = TestContext::new();
    assert_matches!(
        ctx.engine.participation.join(4242, ALICE).await,
        Err(CampBarError::TripNotFound { trip_id: 4242 })
    );

    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.engine.trips.cancel(trip.id, ORGANIZER).await.unwrap();
    assert_matches!(
        ctx.engine.participation.join(trip.id, ALICE).await,
        Err(CampBarError::TripNotActive { status: TripStatus::Cancelled, .. })
    );
}

#[tokio::test]
async fn test_leave_frees_slot_gear_and_votes() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 3).await;
    ctx.join_all(trip.id, &[ALICE]).await;

    let option = ctx
        .engine
        .voting
        .add_option(trip.id, ORGANIZER, date_option(date(2026, 7, 10), date(2026, 7, 12)))
        .await
        .unwrap();
    ctx.engine.voting.vote(trip.id, option.option.id, ALICE).await.unwrap();

    let stove = ctx
        .engine
        .gear
        .add(
            trip.id,
            ORGANIZER,
            CreateGearRequest {
                name: "Stove".to_string(),
                category: Some("cooking".to_string()),
                quantity: Some(1),
                notes: None,
            },
        )
        .await
        .unwrap();
    ctx.engine.gear.volunteer(trip.id, stove.id, ALICE).await.unwrap();
    ctx.engine.gear.set_packed(trip.id, stove.id, ALICE, true).await.unwrap();

    ctx.engine.participation.leave(trip.id, ALICE).await.unwrap();

    let detail = ctx.engine.trips.get_detail(trip.id, ORGANIZER).await.unwrap();
    assert_eq!(detail.trip.current_participants, 1);
    assert!(detail.participants.iter().all(|p| p.user_id != ALICE));
    assert_eq!(detail.date_options[0].vote_count, 0);
    let stove = detail.gear.iter().find(|g| g.id == stove.id).unwrap();
    assert_eq!(stove.assigned_to, None);
    assert!(!stove.packed);

    // The freed slot can be taken again
    ctx.engine.participation.join(trip.id, BOB).await.unwrap();
}

#[tokio::test]
async fn test_leave_rules() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;

    assert_matches!(
        ctx.engine.participation.leave(trip.id, ORGANIZER).await,
        Err(CampBarError::Forbidden(_))
    );
    assert_matches!(
        ctx.engine.participation.leave(trip.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );
    assert_eq!(ctx.trip(trip.id, ORGANIZER).await.current_participants, 1);
}

#[tokio::test]
async fn test_confirm_attendance_requires_confirmed_trip() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE]).await;

    let result = ctx.engine.participation.confirm_attendance(trip.id, ALICE).await;
    assert_matches!(
        result,
        Err(CampBarError::UnexpectedStatus {
            expected: TripStatus::Confirmed,
            actual: TripStatus::Planning
        })
    );

    // Membership is checked before the trip status
    assert_matches!(
        ctx.engine.participation.confirm_attendance(trip.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );
    ctx.engine.trips.cancel(trip.id, ORGANIZER).await.unwrap();
    assert_matches!(
        ctx.engine.participation.leave(trip.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );
}

#[tokio::test]
async fn test_confirm_attendance_is_idempotent() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE]).await;
    let option = ctx
        .engine
        .voting
        .add_option(trip.id, ORGANIZER, date_option(date(2026, 8, 1), date(2026, 8, 3)))
        .await
        .unwrap();
    ctx.engine.voting.confirm(trip.id, option.option.id, ORGANIZER).await.unwrap();

    let first = ctx.engine.participation.confirm_attendance(trip.id, ALICE).await.unwrap();
    assert_eq!(first.status, ParticipantStatus::Confirmed);
    assert_eq!(first.ticket_ref.as_deref(), Some(format!("TICKET-{}-{}", trip.id, ALICE).as_str()));

    let second = ctx.engine.participation.confirm_attendance(trip.id, ALICE).await.unwrap();
    assert_eq!(second, first);

    let alice_requests = ctx
        .issuer
        .requests()
        .into_iter()
        .filter(|r| r.user_id == ALICE)
        .count();
    assert_eq!(alice_requests, 1);

    assert_matches!(
        ctx.engine.participation.confirm_attendance(trip.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );
}
