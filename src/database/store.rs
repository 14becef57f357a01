//! Trip store contract
//!
//! Every engine operation runs inside one [`TripTx`]. A transaction that is
//! dropped without [`TripTx::commit`] leaves the store untouched.

use async_trait::async_trait;

use crate::models::*;
use crate::utils::errors::Result;

/// Source of transactional units of work over trip data
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Begin a new unit of work
    async fn begin(&self) -> Result<Box<dyn TripTx>>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<()>;
}

/// One atomic unit of work.
///
/// `lock_trip` serializes concurrent units of work touching the same trip;
/// mutating operations must lock the trip before reading anything they
/// base a decision on.
#[async_trait]
pub trait TripTx: Send {
    async fn insert_trip(&mut self, trip: &NewTrip) -> Result<Trip>;
    async fn get_trip(&mut self, trip_id: i64) -> Result<Option<Trip>>;
    async fn lock_trip(&mut self, trip_id: i64) -> Result<Option<Trip>>;
    /// Persist every mutable column of `trip` and bump `updated_at`
    async fn save_trip(&mut self, trip: &Trip) -> Result<Trip>;
    async fn list_trips(&mut self, filter: &TripFilter) -> Result<Vec<Trip>>;

    /// Fails with a conflict if the user already has a row for the trip
    async fn insert_participant(&mut self, participant: &NewParticipant) -> Result<Participant>;
    async fn find_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<Option<Participant>>;
    /// Persist the participant's status
    async fn save_participant(&mut self, participant: &Participant) -> Result<Participant>;
    /// Set the ticket reference unless one is already stored. Returns `None`
    /// when the participant is gone or already holds a reference.
    async fn record_ticket(&mut self, trip_id: i64, user_id: UserId, reference: &str) -> Result<Option<Participant>>;
    async fn delete_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<bool>;
    /// Ordered by join time
    async fn list_participants(&mut self, trip_id: i64) -> Result<Vec<Participant>>;

    async fn insert_date_option(
        &mut self,
        trip_id: i64,
        created_by: UserId,
        range: &CreateDateOptionRequest,
    ) -> Result<DateOption>;
    async fn get_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<Option<DateOption>>;
    /// Removes the option together with its votes
    async fn delete_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<bool>;
    /// Ordered by start date
    async fn list_date_options(&mut self, trip_id: i64) -> Result<Vec<DateOption>>;
    /// Fails with a conflict if the user already voted for the option
    async fn insert_vote(&mut self, option_id: i64, user_id: UserId) -> Result<DateVote>;
    async fn delete_vote(&mut self, option_id: i64, user_id: UserId) -> Result<bool>;
    async fn list_votes(&mut self, trip_id: i64) -> Result<Vec<DateVote>>;
    async fn delete_user_votes(&mut self, trip_id: i64, user_id: UserId) -> Result<u64>;

    async fn insert_gear(&mut self, item: &NewGearItem) -> Result<GearItem>;
    async fn get_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<Option<GearItem>>;
    async fn save_gear(&mut self, item: &GearItem) -> Result<GearItem>;
    async fn delete_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<bool>;
    /// Ordered by category, then creation
    async fn list_gear(&mut self, trip_id: i64) -> Result<Vec<GearItem>>;
    /// Unassign everything held by `user_id` on the trip
    async fn release_user_gear(&mut self, trip_id: i64, user_id: UserId) -> Result<u64>;

    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message>;
    /// Ordered by creation time, ties by insertion order
    async fn list_messages(&mut self, trip_id: i64) -> Result<Vec<Message>>;

    async fn insert_alert(&mut self, alert: &NewSosAlert) -> Result<SosAlert>;
    async fn get_alert(&mut self, trip_id: i64, alert_id: i64) -> Result<Option<SosAlert>>;
    async fn save_alert(&mut self, alert: &SosAlert) -> Result<SosAlert>;
    /// Newest first
    async fn list_alerts(&mut self, trip_id: i64, active_only: bool) -> Result<Vec<SosAlert>>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
