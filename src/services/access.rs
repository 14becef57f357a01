//! Trip loading and authorization checks shared by the services

use crate::database::TripTx;
use crate::models::{Participant, Trip, UserId};
use crate::utils::errors::{CampBarError, Result};

/// Load a trip and hold its lock for the rest of the unit of work
pub(crate) async fn lock_trip(tx: &mut dyn TripTx, trip_id: i64) -> Result<Trip> {
    tx.lock_trip(trip_id)
        .await?
        .ok_or(CampBarError::TripNotFound { trip_id })
}

/// Load a trip for reading
pub(crate) async fn fetch_trip(tx: &mut dyn TripTx, trip_id: i64) -> Result<Trip> {
    tx.get_trip(trip_id)
        .await?
        .ok_or(CampBarError::TripNotFound { trip_id })
}

pub(crate) fn require_organizer(trip: &Trip, user_id: UserId) -> Result<()> {
    if !trip.is_organizer(user_id) {
        return Err(CampBarError::Forbidden(
            "Only the trip organizer can do this".to_string(),
        ));
    }
    Ok(())
}

/// The caller's participant row, or `Forbidden` for non-members
pub(crate) async fn require_member(
    tx: &mut dyn TripTx,
    trip: &Trip,
    user_id: UserId,
) -> Result<Participant> {
    tx.find_participant(trip.id, user_id)
        .await?
        .ok_or_else(|| CampBarError::Forbidden("You must join this trip first".to_string()))
}
