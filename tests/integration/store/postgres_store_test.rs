//! PostgreSQL backend tests: constraint mapping, rollback and row locking

use std::sync::Arc;

use assert_matches::assert_matches;
use serial_test::serial;

use campbar::database::{TripStore, TripTx};
use campbar::models::{Difficulty, NewParticipant, NewTrip, ParticipantStatus, TripFilter, TripStatus};
use campbar::services::{LocalTicketIssuer, TracingAttentionSink, TripEngine};
use campbar::CampBarError;

use crate::helpers::*;

fn new_trip(organizer_id: i64, max_participants: i32) -> NewTrip {
    NewTrip {
        title: "Soča valley".to_string(),
        destination: "Bovec".to_string(),
        description: None,
        difficulty: Difficulty::Moderate,
        max_participants,
        estimated_cost: Some("120 EUR".to_string()),
        organizer_id,
    }
}

#[tokio::test]
#[serial]
async fn test_dropped_transaction_rolls_back() {
    let Some(db) = TestDatabase::connect().await else { return };
    let store = db.store();

    let mut tx = store.begin().await.unwrap();
    let trip = tx.insert_trip(&new_trip(ORGANIZER, 4)).await.unwrap();
    assert_eq!(trip.status, TripStatus::Planning);
    drop(tx);
    assert_eq!(db.count_records("trips").await.unwrap(), 0);

    let mut tx = store.begin().await.unwrap();
    let trip = tx.insert_trip(&new_trip(ORGANIZER, 4)).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let loaded = tx.get_trip(trip.id).await.unwrap().unwrap();
    assert_eq!(loaded.estimated_cost.as_deref(), Some("120 EUR"));
    assert_eq!(tx.list_trips(&TripFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn test_constraints_map_to_domain_errors() {
    let Some(db) = TestDatabase::connect().await else { return };
    let store = db.store();

    let mut tx = store.begin().await.unwrap();
    let mut trip = tx.insert_trip(&new_trip(ORGANIZER, 2)).await.unwrap();
    let joined = NewParticipant {
        trip_id: trip.id,
        user_id: ALICE,
        status: ParticipantStatus::Interested,
    };
    tx.insert_participant(&joined).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    assert_matches!(
        tx.insert_participant(&joined).await,
        Err(CampBarError::AlreadyParticipant { user_id: ALICE, .. })
    );
    drop(tx);

    let mut tx = store.begin().await.unwrap();
    trip.current_participants = 3;
    assert_matches!(tx.save_trip(&trip).await, Err(CampBarError::TripFull { .. }));
    drop(tx);

    let mut tx = store.begin().await.unwrap();
    let option = tx
        .insert_date_option(trip.id, ORGANIZER, &date_option(date(2026, 9, 1), date(2026, 9, 2)))
        .await
        .unwrap();
    tx.insert_vote(option.id, ALICE).await.unwrap();
    assert_matches!(
        tx.insert_vote(option.id, ALICE).await,
        Err(CampBarError::AlreadyVoted { .. })
    );
}

#[tokio::test]
#[serial]
async fn test_ticket_reference_written_once() {
    let Some(db) = TestDatabase::connect().await else { return };
    let store = db.store();

    let mut tx = store.begin().await.unwrap();
    let trip = tx.insert_trip(&new_trip(ORGANIZER, 4)).await.unwrap();
    tx.insert_participant(&NewParticipant {
        trip_id: trip.id,
        user_id: ALICE,
        status: ParticipantStatus::Confirmed,
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let recorded = tx.record_ticket(trip.id, ALICE, "CB-first").await.unwrap().unwrap();
    assert_eq!(recorded.ticket_ref.as_deref(), Some("CB-first"));
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    assert!(tx.record_ticket(trip.id, ALICE, "CB-second").await.unwrap().is_none());
    let mut participant = tx.find_participant(trip.id, ALICE).await.unwrap().unwrap();
    participant.ticket_ref = None;
    let saved = tx.save_participant(&participant).await.unwrap();
    assert_eq!(saved.ticket_ref.as_deref(), Some("CB-first"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn test_engine_on_postgres() {
    let Some(db) = TestDatabase::connect().await else { return };
    let store: Arc<dyn TripStore> = Arc::new(db.store());
    let settings = test_settings();
    let engine = TripEngine::new(
        store,
        &settings,
        Arc::new(LocalTicketIssuer),
        Arc::new(TracingAttentionSink),
    );

    let trip = engine.trips.create(ORGANIZER, trip_request(2)).await.unwrap();
    let trip_id = trip.id;

    let joins: Vec<_> = [BOB, CAROL]
        .into_iter()
        .map(|user_id| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.participation.join(trip_id, user_id).await })
        })
        .collect();
    let mut results = Vec::new();
    for join in joins {
        results.push(join.await.unwrap());
    }
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(CampBarError::TripFull { .. }))));

    let gear_id = engine
        .gear
        .add(trip_id, ORGANIZER, gear_request("Stove", "cooking"))
        .await
        .unwrap()
        .id;
    let winner = results
        .iter()
        .find_map(|r| r.as_ref().ok().map(|p| p.user_id))
        .unwrap();
    let volunteers: Vec<_> = [ORGANIZER, winner]
        .into_iter()
        .map(|user_id| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.gear.volunteer(trip_id, gear_id, user_id).await })
        })
        .collect();
    let mut claims = Vec::new();
    for volunteer in volunteers {
        claims.push(volunteer.await.unwrap());
    }
    let holder = claims
        .iter()
        .find_map(|r| r.as_ref().ok().and_then(|item| item.assigned_to))
        .unwrap();
    assert_eq!(claims.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(claims
        .iter()
        .any(|r| matches!(r, Err(CampBarError::AlreadyAssigned { assigned_to, .. }) if *assigned_to == holder)));
    let groups = engine.gear.list_grouped(trip_id).await.unwrap();
    assert_eq!(groups[0].items[0].assigned_to, Some(holder));

    let option = engine
        .voting
        .add_option(trip_id, ORGANIZER, date_option(date(2026, 10, 2), date(2026, 10, 4)))
        .await
        .unwrap();
    let confirmed = engine.voting.confirm(trip_id, option.option.id, ORGANIZER).await.unwrap();
    assert_eq!(confirmed.status, TripStatus::Confirmed);

    let detail = engine.trips.get_detail(trip_id, ORGANIZER).await.unwrap();
    assert_eq!(detail.trip.current_participants, 2);
    let organizer = detail
        .participants
        .iter()
        .find(|p| p.user_id == ORGANIZER)
        .unwrap();
    assert!(organizer.ticket_ref.as_deref().unwrap().starts_with(&format!("CB-{}-{}-", trip_id, ORGANIZER)));
}
