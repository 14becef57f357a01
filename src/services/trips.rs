//! Trip service implementation
//!
//! Creation, editing, listing, detail reads and lifecycle moves that the
//! organizer makes directly. Date confirmation lives in the voting service.

use std::sync::Arc;

use tracing::{debug, info};

use super::access::{fetch_trip, lock_trip, require_organizer};
use super::lifecycle::{check_transition, ensure_active, is_manual_target};
use crate::database::TripStore;
use crate::models::{
    CreateTripRequest, DateOptionSummary, NewParticipant, ParticipantStatus, Trip, TripDetail,
    TripFilter, TripStatus, UpdateTripRequest, UserId,
};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::logging::log_trip_action;

#[derive(Clone)]
pub struct TripService {
    store: Arc<dyn TripStore>,
}

impl TripService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Create a trip in `planning` with the caller as organizer.
    ///
    /// The organizer is recorded as a confirmed participant and takes one slot.
    pub async fn create(&self, organizer_id: UserId, request: CreateTripRequest) -> Result<Trip> {
        let new_trip = request.into_new_trip(organizer_id)?;

        let mut tx = self.store.begin().await?;
        let mut trip = tx.insert_trip(&new_trip).await?;
        tx.insert_participant(&NewParticipant {
            trip_id: trip.id,
            user_id: organizer_id,
            status: ParticipantStatus::Confirmed,
        })
        .await?;
        trip.current_participants = 1;
        let trip = tx.save_trip(&trip).await?;
        tx.commit().await?;

        log_trip_action(trip.id, "create", organizer_id, Some(&trip.title));
        Ok(trip)
    }

    /// Trip with participants, date tallies and gear; messages only for members
    pub async fn get_detail(&self, trip_id: i64, viewer_id: UserId) -> Result<TripDetail> {
        debug!(trip_id = trip_id, user_id = viewer_id, "Loading trip detail");

        let mut tx = self.store.begin().await?;
        let trip = fetch_trip(tx.as_mut(), trip_id).await?;
        let participants = tx.list_participants(trip_id).await?;
        let options = tx.list_date_options(trip_id).await?;
        let votes = tx.list_votes(trip_id).await?;
        let gear = tx.list_gear(trip_id).await?;

        let is_member = participants.iter().any(|p| p.user_id == viewer_id);
        let messages = if is_member {
            Some(tx.list_messages(trip_id).await?)
        } else {
            None
        };

        let date_options = options
            .into_iter()
            .map(|option| DateOptionSummary::tally(option, &votes))
            .collect();

        Ok(TripDetail {
            trip,
            participants,
            date_options,
            gear,
            messages,
        })
    }

    pub async fn list(&self, filter: &TripFilter) -> Result<Vec<Trip>> {
        let mut tx = self.store.begin().await?;
        tx.list_trips(filter).await
    }

    /// Edit trip fields (organizer only, non-terminal trips)
    pub async fn update(&self, trip_id: i64, user_id: UserId, request: UpdateTripRequest) -> Result<Trip> {
        let mut tx = self.store.begin().await?;
        let mut trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;

        request.apply_to(&mut trip)?;
        let trip = tx.save_trip(&trip).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "update", user_id, None);
        Ok(trip)
    }

    /// Cancel the trip; irreversible
    pub async fn cancel(&self, trip_id: i64, user_id: UserId) -> Result<Trip> {
        self.transition(trip_id, user_id, TripStatus::Cancelled).await
    }

    /// Organizer-requested status change (`ongoing`, `completed` or `cancelled`)
    pub async fn change_status(&self, trip_id: i64, user_id: UserId, target: TripStatus) -> Result<Trip> {
        self.transition(trip_id, user_id, target).await
    }

    async fn transition(&self, trip_id: i64, user_id: UserId, target: TripStatus) -> Result<Trip> {
        let mut tx = self.store.begin().await?;
        let mut trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;

        if !is_manual_target(target) {
            return Err(CampBarError::InvalidStateTransition {
                from: trip.status,
                to: target,
            });
        }
        check_transition(trip.status, target)?;

        let from = trip.status;
        trip.status = target;
        let trip = tx.save_trip(&trip).await?;
        tx.commit().await?;

        info!(trip_id = trip_id, user_id = user_id, from = %from, to = %target, "Trip status changed");
        Ok(trip)
    }
}
