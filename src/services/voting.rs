//! Date voting service implementation
//!
//! The organizer proposes date ranges, members vote, and the organizer
//! confirms one option. Confirmation fixes the trip dates, moves the trip to
//! `confirmed` and closes voting for good.

use std::sync::Arc;

use tracing::{info, warn};

use super::access::{fetch_trip, lock_trip, require_member, require_organizer};
use super::lifecycle::{check_transition, ensure_active, ensure_voting_open};
use super::ticketing::TicketingService;
use crate::database::{TripStore, TripTx};
use crate::models::{
    CreateDateOptionRequest, DateOption, DateOptionSummary, ParticipantStatus, Trip, TripStatus,
    UserId,
};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::logging::log_trip_action;

#[derive(Clone)]
pub struct VotingService {
    store: Arc<dyn TripStore>,
    ticketing: TicketingService,
}

impl VotingService {
    pub fn new(store: Arc<dyn TripStore>, ticketing: TicketingService) -> Self {
        Self { store, ticketing }
    }

    /// Date options of a trip with their tallies, earliest first
    pub async fn list_options(&self, trip_id: i64) -> Result<Vec<DateOptionSummary>> {
        let mut tx = self.store.begin().await?;
        fetch_trip(tx.as_mut(), trip_id).await?;
        let options = tx.list_date_options(trip_id).await?;
        let votes = tx.list_votes(trip_id).await?;

        Ok(options
            .into_iter()
            .map(|option| DateOptionSummary::tally(option, &votes))
            .collect())
    }

    pub async fn add_option(
        &self,
        trip_id: i64,
        user_id: UserId,
        request: CreateDateOptionRequest,
    ) -> Result<DateOptionSummary> {
        request.validate()?;

        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;
        ensure_voting_open(&trip)?;

        let option = tx.insert_date_option(trip_id, user_id, &request).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "add_date_option", user_id, None);
        Ok(DateOptionSummary::tally(option, &[]))
    }

    /// Remove an option together with its votes
    pub async fn delete_option(&self, trip_id: i64, option_id: i64, user_id: UserId) -> Result<()> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;
        ensure_voting_open(&trip)?;

        if !tx.delete_date_option(trip_id, option_id).await? {
            return Err(CampBarError::DateOptionNotFound { trip_id, option_id });
        }
        tx.commit().await?;

        log_trip_action(trip_id, "delete_date_option", user_id, None);
        Ok(())
    }

    pub async fn vote(&self, trip_id: i64, option_id: i64, user_id: UserId) -> Result<DateOptionSummary> {
        let mut tx = self.store.begin().await?;
        let option = self.open_ballot(tx.as_mut(), trip_id, option_id, user_id).await?;

        tx.insert_vote(option_id, user_id).await?;
        let summary = tally_option(tx.as_mut(), option).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "vote", user_id, None);
        Ok(summary)
    }

    pub async fn unvote(&self, trip_id: i64, option_id: i64, user_id: UserId) -> Result<DateOptionSummary> {
        let mut tx = self.store.begin().await?;
        let option = self.open_ballot(tx.as_mut(), trip_id, option_id, user_id).await?;

        if !tx.delete_vote(option_id, user_id).await? {
            return Err(CampBarError::NotVoted { option_id, user_id });
        }
        let summary = tally_option(tx.as_mut(), option).await?;
        tx.commit().await?;

        log_trip_action(trip_id, "unvote", user_id, None);
        Ok(summary)
    }

    /// Fix the trip dates to `option_id` and move the trip to `confirmed`.
    ///
    /// Confirmed participants get tickets after the change is stored.
    pub async fn confirm(&self, trip_id: i64, option_id: i64, user_id: UserId) -> Result<Trip> {
        let mut tx = self.store.begin().await?;
        let mut trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_organizer(&trip, user_id)?;
        ensure_active(&trip)?;
        ensure_voting_open(&trip)?;
        check_transition(trip.status, TripStatus::Confirmed)?;

        let option = tx
            .get_date_option(trip_id, option_id)
            .await?
            .ok_or(CampBarError::DateOptionNotFound { trip_id, option_id })?;

        trip.start_date = Some(option.start_date);
        trip.end_date = Some(option.end_date);
        trip.dates_confirmed = true;
        trip.status = TripStatus::Confirmed;
        let trip = tx.save_trip(&trip).await?;

        let confirmed: Vec<_> = tx
            .list_participants(trip_id)
            .await?
            .into_iter()
            .filter(|p| p.status == ParticipantStatus::Confirmed)
            .collect();
        tx.commit().await?;

        info!(
            trip_id = trip_id,
            option_id = option_id,
            start_date = %option.start_date,
            end_date = %option.end_date,
            "Trip dates confirmed"
        );

        if let Err(e) = self.ticketing.issue_for(&trip, confirmed).await {
            warn!(trip_id = trip_id, error = %e, "Ticket issuance failed");
        }

        Ok(trip)
    }

    /// Common checks for vote and unvote; returns the option being voted on
    async fn open_ballot(
        &self,
        tx: &mut dyn TripTx,
        trip_id: i64,
        option_id: i64,
        user_id: UserId,
    ) -> Result<DateOption> {
        let trip = lock_trip(tx, trip_id).await?;
        require_member(tx, &trip, user_id).await?;
        ensure_active(&trip)?;
        ensure_voting_open(&trip)?;

        tx.get_date_option(trip_id, option_id)
            .await?
            .ok_or(CampBarError::DateOptionNotFound { trip_id, option_id })
    }
}

async fn tally_option(tx: &mut dyn TripTx, option: DateOption) -> Result<DateOptionSummary> {
    let votes = tx.list_votes(option.trip_id).await?;
    Ok(DateOptionSummary::tally(option, &votes))
}
