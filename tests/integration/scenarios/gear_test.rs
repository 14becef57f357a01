//! Gear coordination scenario tests

use assert_matches::assert_matches;

use campbar::models::UpdateGearRequest;
use campbar::CampBarError;

use crate::helpers::*;

#[tokio::test]
async fn test_gear_grouped_by_category() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    for (name, category) in [("Tent", "Shelter"), ("Stove", "cooking"), ("Tarp", "shelter")] {
        ctx.engine
            .gear
            .add(trip.id, ORGANIZER, gear_request(name, category))
            .await
            .unwrap();
    }

    let groups = ctx.engine.gear.list_grouped(trip.id).await.unwrap();
    let categories: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(categories, vec!["cooking", "shelter"]);
    let shelter: Vec<_> = groups[1].items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(shelter, vec!["Tent", "Tarp"]);
}

#[tokio::test]
async fn test_only_organizer_edits_the_list() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE]).await;

    assert_matches!(
        ctx.engine.gear.add(trip.id, ALICE, gear_request("Rope", "climbing")).await,
        Err(CampBarError::Forbidden(_))
    );

    let rope = ctx
        .engine
        .gear
        .add(trip.id, ORGANIZER, gear_request("Rope", "climbing"))
        .await
        .unwrap();
    let update = UpdateGearRequest {
        quantity: Some(2),
        notes: Some("60m dynamic".to_string()),
        ..Default::default()
    };
    assert_matches!(
        ctx.engine.gear.update(trip.id, rope.id, ALICE, update.clone()).await,
        Err(CampBarError::Forbidden(_))
    );
    let rope = ctx.engine.gear.update(trip.id, rope.id, ORGANIZER, update).await.unwrap();
    assert_eq!(rope.quantity, 2);
    assert_eq!(rope.notes.as_deref(), Some("60m dynamic"));

    ctx.engine.gear.delete(trip.id, rope.id, ORGANIZER).await.unwrap();
    assert_matches!(
        ctx.engine.gear.delete(trip.id, rope.id, ORGANIZER).await,
        Err(CampBarError::GearItemNotFound { .. })
    );
}

#[tokio::test]
async fn test_volunteer_toggles_and_conflicts() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE, BOB]).await;
    let tent = ctx
        .engine
        .gear
        .add(trip.id, ORGANIZER, gear_request("Tent", "shelter"))
        .await
        .unwrap();

    let claimed = ctx.engine.gear.volunteer(trip.id, tent.id, ALICE).await.unwrap();
    assert_eq!(claimed.assigned_to, Some(ALICE));

    assert_matches!(
        ctx.engine.gear.volunteer(trip.id, tent.id, BOB).await,
        Err(CampBarError::AlreadyAssigned { assigned_to: ALICE, .. })
    );
    assert_matches!(
        ctx.engine.gear.volunteer(trip.id, tent.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );

    let released = ctx.engine.gear.volunteer(trip.id, tent.id, ALICE).await.unwrap();
    assert_eq!(released.assigned_to, None);

    let claimed = ctx.engine.gear.volunteer(trip.id, tent.id, BOB).await.unwrap();
    assert_eq!(claimed.assigned_to, Some(BOB));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_volunteers_single_holder() {
    let ctx = TestContext::new();
    let trip_id = ctx.create_trip(ORGANIZER, 4).await.id;
    ctx.join_all(trip_id, &[ALICE, BOB]).await;
    let gear_id = ctx
        .engine
        .gear
        .add(trip_id, ORGANIZER, gear_request("Stove", "cooking"))
        .await
        .unwrap()
        .id;

    let attempts: Vec<_> = [ALICE, BOB]
        .into_iter()
        .map(|user_id| {
            let engine = ctx.engine.clone();
            tokio::spawn(async move { (user_id, engine.gear.volunteer(trip_id, gear_id, user_id).await) })
        })
        .collect();
    let mut results = Vec::new();
    for attempt in attempts {
        results.push(attempt.await.unwrap());
    }

    let winners: Vec<_> = results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(user_id, _)| *user_id)
        .collect();
    assert_eq!(winners.len(), 1);
    let winner = winners[0];
    assert!(results
        .iter()
        .any(|(_, r)| matches!(r, Err(CampBarError::AlreadyAssigned { assigned_to, .. }) if *assigned_to == winner)));

    let groups = ctx.engine.gear.list_grouped(trip_id).await.unwrap();
    assert_eq!(groups[0].items[0].assigned_to, Some(winner));
}

#[tokio::test]
async fn test_release_and_packing_permissions() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    ctx.join_all(trip.id, &[ALICE, BOB]).await;
    let stove = ctx
        .engine
        .gear
        .add(trip.id, ORGANIZER, gear_request("Stove", "cooking"))
        .await
        .unwrap();

    // Releasing an unassigned item changes nothing, but only for members
    let unchanged = ctx.engine.gear.release(trip.id, stove.id, BOB).await.unwrap();
    assert_eq!(unchanged.assigned_to, None);
    assert_matches!(
        ctx.engine.gear.release(trip.id, stove.id, OUTSIDER).await,
        Err(CampBarError::Forbidden(_))
    );

    ctx.engine.gear.volunteer(trip.id, stove.id, ALICE).await.unwrap();
    assert_matches!(
        ctx.engine.gear.set_packed(trip.id, stove.id, BOB, true).await,
        Err(CampBarError::Forbidden(_))
    );
    let packed = ctx.engine.gear.set_packed(trip.id, stove.id, ALICE, true).await.unwrap();
    assert!(packed.packed);

    assert_matches!(
        ctx.engine.gear.release(trip.id, stove.id, BOB).await,
        Err(CampBarError::Forbidden(_))
    );
    let released = ctx.engine.gear.release(trip.id, stove.id, ORGANIZER).await.unwrap();
    assert_eq!(released.assigned_to, None);
    assert!(!released.packed);
}

#[tokio::test]
async fn test_gear_frozen_after_completion() {
    let ctx = TestContext::new();
    let trip = ctx.create_trip(ORGANIZER, 4).await;
    let tent = ctx
        .engine
        .gear
        .add(trip.id, ORGANIZER, gear_request("Tent", "shelter"))
        .await
        .unwrap();
    ctx.engine.trips.cancel(trip.id, ORGANIZER).await.unwrap();

    assert_matches!(
        ctx.engine.gear.volunteer(trip.id, tent.id, ORGANIZER).await,
        Err(CampBarError::TripNotActive { .. })
    );
    assert_matches!(
        ctx.engine.gear.add(trip.id, ORGANIZER, gear_request("Tarp", "shelter")).await,
        Err(CampBarError::TripNotActive { .. })
    );
    // The list stays readable
    assert_eq!(ctx.engine.gear.list_grouped(trip.id).await.unwrap().len(), 1);
}
