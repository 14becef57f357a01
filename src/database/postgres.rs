//! PostgreSQL trip store
//!
//! Each unit of work is one database transaction. `lock_trip` takes the
//! trip row with `FOR UPDATE`, which serializes concurrent work on a trip.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};

use super::connection::{self, DatabasePool};
use super::repositories::{
    DateOptionRepository, GearRepository, MessageRepository, ParticipantRepository, SosRepository,
    TripRepository,
};
use super::store::{TripStore, TripTx};
use crate::models::*;
use crate::utils::errors::Result;
use crate::utils::logging::log_database_operation;

#[derive(Debug, Clone)]
pub struct PgTripStore {
    pool: DatabasePool,
}

impl PgTripStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripStore for PgTripStore {
    async fn begin(&self) -> Result<Box<dyn TripTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTripTx {
            tx,
            started: Instant::now(),
        }))
    }

    async fn health_check(&self) -> Result<()> {
        connection::health_check(&self.pool).await
    }
}

pub struct PgTripTx {
    tx: Transaction<'static, Postgres>,
    started: Instant,
}

#[async_trait]
impl TripTx for PgTripTx {
    async fn insert_trip(&mut self, trip: &NewTrip) -> Result<Trip> {
        TripRepository::insert(&mut self.tx, trip).await
    }

    async fn get_trip(&mut self, trip_id: i64) -> Result<Option<Trip>> {
        TripRepository::find_by_id(&mut self.tx, trip_id).await
    }

    async fn lock_trip(&mut self, trip_id: i64) -> Result<Option<Trip>> {
        TripRepository::lock_by_id(&mut self.tx, trip_id).await
    }

    async fn save_trip(&mut self, trip: &Trip) -> Result<Trip> {
        TripRepository::update(&mut self.tx, trip).await
    }

    async fn list_trips(&mut self, filter: &TripFilter) -> Result<Vec<Trip>> {
        TripRepository::list(&mut self.tx, filter).await
    }

    async fn insert_participant(&mut self, participant: &NewParticipant) -> Result<Participant> {
        ParticipantRepository::insert(&mut self.tx, participant).await
    }

    async fn find_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<Option<Participant>> {
        ParticipantRepository::find(&mut self.tx, trip_id, user_id).await
    }

    async fn save_participant(&mut self, participant: &Participant) -> Result<Participant> {
        ParticipantRepository::update(&mut self.tx, participant).await
    }

    async fn record_ticket(&mut self, trip_id: i64, user_id: UserId, reference: &str) -> Result<Option<Participant>> {
        ParticipantRepository::record_ticket(&mut self.tx, trip_id, user_id, reference).await
    }

    async fn delete_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<bool> {
        ParticipantRepository::delete(&mut self.tx, trip_id, user_id).await
    }

    async fn list_participants(&mut self, trip_id: i64) -> Result<Vec<Participant>> {
        ParticipantRepository::list_for_trip(&mut self.tx, trip_id).await
    }

    async fn insert_date_option(
        &mut self,
        trip_id: i64,
        created_by: UserId,
        range: &CreateDateOptionRequest,
    ) -> Result<DateOption> {
        DateOptionRepository::insert(&mut self.tx, trip_id, created_by, range).await
    }

    async fn get_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<Option<DateOption>> {
        DateOptionRepository::find(&mut self.tx, trip_id, option_id).await
    }

    async fn delete_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<bool> {
        DateOptionRepository::delete(&mut self.tx, trip_id, option_id).await
    }

    async fn list_date_options(&mut self, trip_id: i64) -> Result<Vec<DateOption>> {
        DateOptionRepository::list_for_trip(&mut self.tx, trip_id).await
    }

    async fn insert_vote(&mut self, option_id: i64, user_id: UserId) -> Result<DateVote> {
        DateOptionRepository::insert_vote(&mut self.tx, option_id, user_id).await
    }

    async fn delete_vote(&mut self, option_id: i64, user_id: UserId) -> Result<bool> {
        DateOptionRepository::delete_vote(&mut self.tx, option_id, user_id).await
    }

    async fn list_votes(&mut self, trip_id: i64) -> Result<Vec<DateVote>> {
        DateOptionRepository::list_votes_for_trip(&mut self.tx, trip_id).await
    }

    async fn delete_user_votes(&mut self, trip_id: i64, user_id: UserId) -> Result<u64> {
        DateOptionRepository::delete_user_votes(&mut self.tx, trip_id, user_id).await
    }

    async fn insert_gear(&mut self, item: &NewGearItem) -> Result<GearItem> {
        GearRepository::insert(&mut self.tx, item).await
    }

    async fn get_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<Option<GearItem>> {
        GearRepository::find(&mut self.tx, trip_id, gear_id).await
    }

    async fn save_gear(&mut self, item: &GearItem) -> Result<GearItem> {
        GearRepository::update(&mut self.tx, item).await
    }

    async fn delete_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<bool> {
        GearRepository::delete(&mut self.tx, trip_id, gear_id).await
    }

    async fn list_gear(&mut self, trip_id: i64) -> Result<Vec<GearItem>> {
        GearRepository::list_for_trip(&mut self.tx, trip_id).await
    }

    async fn release_user_gear(&mut self, trip_id: i64, user_id: UserId) -> Result<u64> {
        GearRepository::release_for_user(&mut self.tx, trip_id, user_id).await
    }

    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message> {
        MessageRepository::insert(&mut self.tx, message).await
    }

    async fn list_messages(&mut self, trip_id: i64) -> Result<Vec<Message>> {
        MessageRepository::list_for_trip(&mut self.tx, trip_id).await
    }

    async fn insert_alert(&mut self, alert: &NewSosAlert) -> Result<SosAlert> {
        SosRepository::insert(&mut self.tx, alert).await
    }

    async fn get_alert(&mut self, trip_id: i64, alert_id: i64) -> Result<Option<SosAlert>> {
        SosRepository::find(&mut self.tx, trip_id, alert_id).await
    }

    async fn save_alert(&mut self, alert: &SosAlert) -> Result<SosAlert> {
        SosRepository::update_resolution(&mut self.tx, alert).await
    }

    async fn list_alerts(&mut self, trip_id: i64, active_only: bool) -> Result<Vec<SosAlert>> {
        SosRepository::list_for_trip(&mut self.tx, trip_id, active_only).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let PgTripTx { tx, started } = *self;
        let result = tx.commit().await;
        log_database_operation(
            "commit",
            "transaction",
            started.elapsed().as_millis() as u64,
            result.is_ok(),
        );
        result?;
        Ok(())
    }
}
