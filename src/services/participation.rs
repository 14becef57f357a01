//! Participation service implementation
//!
//! Join, leave and attendance confirmation. Every operation acts for the
//! calling user only.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::access::{lock_trip, require_member};
use super::lifecycle::ensure_active;
use super::ticketing::TicketingService;
use crate::database::TripStore;
use crate::models::{NewParticipant, Participant, ParticipantStatus, TripStatus, UserId};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::logging::log_trip_action;

#[derive(Clone)]
pub struct ParticipationService {
    store: Arc<dyn TripStore>,
    ticketing: TicketingService,
}

impl ParticipationService {
    pub fn new(store: Arc<dyn TripStore>, ticketing: TicketingService) -> Self {
        Self { store, ticketing }
    }

    /// Join a trip as `interested`, taking one slot
    pub async fn join(&self, trip_id: i64, user_id: UserId) -> Result<Participant> {
        let mut tx = self.store.begin().await?;
        let mut trip = lock_trip(tx.as_mut(), trip_id).await?;
        ensure_active(&trip)?;

        if tx.find_participant(trip_id, user_id).await?.is_some() {
            return Err(CampBarError::AlreadyParticipant { trip_id, user_id });
        }
        if trip.is_full() {
            debug!(trip_id = trip_id, user_id = user_id, "Join rejected, trip is full");
            return Err(CampBarError::TripFull { trip_id });
        }

        let participant = tx
            .insert_participant(&NewParticipant {
                trip_id,
                user_id,
                status: ParticipantStatus::Interested,
            })
            .await?;
        trip.current_participants += 1;
        tx.save_trip(&trip).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "join", user_id, None);
        Ok(participant)
    }

    /// Leave a trip, giving back the slot, carried gear and votes
    pub async fn leave(&self, trip_id: i64, user_id: UserId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let mut trip = lock_trip(tx.as_mut(), trip_id).await?;

        if trip.is_organizer(user_id) {
            return Err(CampBarError::Forbidden(
                "The organizer cannot leave; cancel the trip instead".to_string(),
            ));
        }
        require_member(tx.as_mut(), &trip, user_id).await?;
        ensure_active(&trip)?;

        if !tx.delete_participant(trip_id, user_id).await? {
            return Err(CampBarError::ParticipantNotFound { trip_id, user_id });
        }
        let released = tx.release_user_gear(trip_id, user_id).await?;
        let withdrawn = tx.delete_user_votes(trip_id, user_id).await?;

        trip.current_participants = (trip.current_participants - 1).max(0);
        tx.save_trip(&trip).await?;
        tx.commit().await?;

        info!(
            trip_id = trip_id,
            user_id = user_id,
            released_gear = released,
            withdrawn_votes = withdrawn,
            "Participant left trip"
        );
        Ok(())
    }

    /// Confirm attendance on a `confirmed` trip; repeating it is a no-op.
    ///
    /// A ticket is requested once the confirmation is stored. Ticketing
    /// failures leave the participant confirmed without a reference.
    pub async fn confirm_attendance(&self, trip_id: i64, user_id: UserId) -> Result<Participant> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        let mut participant = require_member(tx.as_mut(), &trip, user_id).await?;
        ensure_active(&trip)?;
        if trip.status != TripStatus::Confirmed {
            return Err(CampBarError::UnexpectedStatus {
                expected: TripStatus::Confirmed,
                actual: trip.status,
            });
        }

        if participant.status != ParticipantStatus::Confirmed {
            participant.status = ParticipantStatus::Confirmed;
            participant = tx.save_participant(&participant).await?;
            log_trip_action(trip_id, "confirm_attendance", user_id, None);
        }
        tx.commit().await?;

        if !participant.needs_ticket() {
            return Ok(participant);
        }
        match self.ticketing.issue_for(&trip, vec![participant.clone()]).await {
            Ok(mut issued) => Ok(issued.pop().unwrap_or(participant)),
            Err(e) => {
                warn!(trip_id = trip_id, user_id = user_id, error = %e, "Ticket issuance failed");
                Ok(participant)
            }
        }
    }
}
