//! Trip lifecycle rules
//!
//! `planning -> confirmed -> ongoing -> completed`, with `cancelled`
//! reachable from every non-terminal state. Nothing leaves a terminal state.

use crate::models::{Trip, TripStatus};
use crate::utils::errors::{CampBarError, Result};

/// Check that `from -> to` is a legal lifecycle step
pub fn check_transition(from: TripStatus, to: TripStatus) -> Result<()> {
    let allowed = match (from, to) {
        (from, _) if from.is_terminal() => false,
        (_, TripStatus::Cancelled) => true,
        (TripStatus::Planning, TripStatus::Confirmed) => true,
        (TripStatus::Confirmed, TripStatus::Ongoing) => true,
        (TripStatus::Ongoing, TripStatus::Completed) => true,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(CampBarError::InvalidStateTransition { from, to })
    }
}

/// Statuses the organizer may request directly. `confirmed` is only reached
/// by confirming a date option.
pub fn is_manual_target(status: TripStatus) -> bool {
    matches!(
        status,
        TripStatus::Ongoing | TripStatus::Completed | TripStatus::Cancelled
    )
}

/// Reject mutations on completed or cancelled trips
pub fn ensure_active(trip: &Trip) -> Result<()> {
    if trip.status.is_terminal() {
        return Err(CampBarError::TripNotActive {
            trip_id: trip.id,
            status: trip.status,
        });
    }
    Ok(())
}

/// Date options can be added, voted on and removed only before confirmation
pub fn ensure_voting_open(trip: &Trip) -> Result<()> {
    if trip.dates_confirmed || trip.status != TripStatus::Planning {
        return Err(CampBarError::VotingClosed { trip_id: trip.id });
    }
    Ok(())
}
