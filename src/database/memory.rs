//! In-memory trip store for local development and tests.
//!
//! A transaction holds the store-wide lock for its whole lifetime and works
//! on a copy of the state; commit swaps the copy in, drop discards it.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::store::{TripStore, TripTx};
use crate::models::*;
use crate::utils::errors::{CampBarError, Result};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: i64,
    trips: BTreeMap<i64, Trip>,
    participants: BTreeMap<i64, Participant>,
    date_options: BTreeMap<i64, DateOption>,
    votes: Vec<DateVote>,
    gear: BTreeMap<i64, GearItem>,
    messages: BTreeMap<i64, Message>,
    alerts: BTreeMap<i64, SosAlert>,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTripStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn begin(&self) -> Result<Box<dyn TripTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTripTx { guard, working }))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

pub struct MemoryTripTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl TripTx for MemoryTripTx {
    async fn insert_trip(&mut self, trip: &NewTrip) -> Result<Trip> {
        let now = Utc::now();
        let id = self.working.next_id();
        let trip = Trip {
            id,
            title: trip.title.clone(),
            destination: trip.destination.clone(),
            description: trip.description.clone(),
            difficulty: trip.difficulty,
            status: TripStatus::Planning,
            start_date: None,
            end_date: None,
            max_participants: trip.max_participants,
            current_participants: 0,
            estimated_cost: trip.estimated_cost.clone(),
            dates_confirmed: false,
            organizer_id: trip.organizer_id,
            created_at: now,
            updated_at: now,
        };
        self.working.trips.insert(id, trip.clone());
        Ok(trip)
    }

    async fn get_trip(&mut self, trip_id: i64) -> Result<Option<Trip>> {
        Ok(self.working.trips.get(&trip_id).cloned())
    }

    async fn lock_trip(&mut self, trip_id: i64) -> Result<Option<Trip>> {
        // The whole store is already locked by this transaction
        self.get_trip(trip_id).await
    }

    async fn save_trip(&mut self, trip: &Trip) -> Result<Trip> {
        let stored = self
            .working
            .trips
            .get_mut(&trip.id)
            .ok_or(CampBarError::TripNotFound { trip_id: trip.id })?;
        if trip.current_participants > trip.max_participants {
            return Err(CampBarError::TripFull { trip_id: trip.id });
        }
        let organizer_id = stored.organizer_id;
        *stored = Trip {
            organizer_id,
            updated_at: Utc::now(),
            ..trip.clone()
        };
        Ok(stored.clone())
    }

    async fn list_trips(&mut self, filter: &TripFilter) -> Result<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .working
            .trips
            .values()
            .filter(|trip| filter.matches(trip))
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(trips
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect())
    }

    async fn insert_participant(&mut self, participant: &NewParticipant) -> Result<Participant> {
        if self
            .find_participant(participant.trip_id, participant.user_id)
            .await?
            .is_some()
        {
            return Err(CampBarError::AlreadyParticipant {
                trip_id: participant.trip_id,
                user_id: participant.user_id,
            });
        }
        let id = self.working.next_id();
        let row = Participant {
            id,
            trip_id: participant.trip_id,
            user_id: participant.user_id,
            status: participant.status,
            joined_at: Utc::now(),
            ticket_ref: None,
        };
        self.working.participants.insert(id, row.clone());
        Ok(row)
    }

    async fn find_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<Option<Participant>> {
        Ok(self
            .working
            .participants
            .values()
            .find(|p| p.trip_id == trip_id && p.user_id == user_id)
            .cloned())
    }

    async fn save_participant(&mut self, participant: &Participant) -> Result<Participant> {
        let stored = self
            .working
            .participants
            .get_mut(&participant.id)
            .ok_or(CampBarError::ParticipantNotFound {
                trip_id: participant.trip_id,
                user_id: participant.user_id,
            })?;
        stored.status = participant.status;
        Ok(stored.clone())
    }

    async fn record_ticket(&mut self, trip_id: i64, user_id: UserId, reference: &str) -> Result<Option<Participant>> {
        let stored = self
            .working
            .participants
            .values_mut()
            .find(|p| p.trip_id == trip_id && p.user_id == user_id && p.ticket_ref.is_none());
        Ok(stored.map(|p| {
            p.ticket_ref = Some(reference.to_string());
            p.clone()
        }))
    }

    async fn delete_participant(&mut self, trip_id: i64, user_id: UserId) -> Result<bool> {
        let before = self.working.participants.len();
        self.working
            .participants
            .retain(|_, p| !(p.trip_id == trip_id && p.user_id == user_id));
        Ok(self.working.participants.len() < before)
    }

    async fn list_participants(&mut self, trip_id: i64) -> Result<Vec<Participant>> {
        let mut participants: Vec<Participant> = self
            .working
            .participants
            .values()
            .filter(|p| p.trip_id == trip_id)
            .cloned()
            .collect();
        participants.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
        Ok(participants)
    }

    async fn insert_date_option(
        &mut self,
        trip_id: i64,
        created_by: UserId,
        range: &CreateDateOptionRequest,
    ) -> Result<DateOption> {
        let id = self.working.next_id();
        let option = DateOption {
            id,
            trip_id,
            start_date: range.start_date,
            end_date: range.end_date,
            created_by,
            created_at: Utc::now(),
        };
        self.working.date_options.insert(id, option.clone());
        Ok(option)
    }

    async fn get_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<Option<DateOption>> {
        Ok(self
            .working
            .date_options
            .get(&option_id)
            .filter(|o| o.trip_id == trip_id)
            .cloned())
    }

    async fn delete_date_option(&mut self, trip_id: i64, option_id: i64) -> Result<bool> {
        if self.get_date_option(trip_id, option_id).await?.is_none() {
            return Ok(false);
        }
        self.working.date_options.remove(&option_id);
        self.working.votes.retain(|v| v.date_option_id != option_id);
        Ok(true)
    }

    async fn list_date_options(&mut self, trip_id: i64) -> Result<Vec<DateOption>> {
        let mut options: Vec<DateOption> = self
            .working
            .date_options
            .values()
            .filter(|o| o.trip_id == trip_id)
            .cloned()
            .collect();
        options.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(options)
    }

    async fn insert_vote(&mut self, option_id: i64, user_id: UserId) -> Result<DateVote> {
        let exists = self
            .working
            .votes
            .iter()
            .any(|v| v.date_option_id == option_id && v.user_id == user_id);
        if exists {
            return Err(CampBarError::AlreadyVoted { option_id, user_id });
        }
        let vote = DateVote {
            date_option_id: option_id,
            user_id,
            voted_at: Utc::now(),
        };
        self.working.votes.push(vote.clone());
        Ok(vote)
    }

    async fn delete_vote(&mut self, option_id: i64, user_id: UserId) -> Result<bool> {
        let before = self.working.votes.len();
        self.working
            .votes
            .retain(|v| !(v.date_option_id == option_id && v.user_id == user_id));
        Ok(self.working.votes.len() < before)
    }

    async fn list_votes(&mut self, trip_id: i64) -> Result<Vec<DateVote>> {
        let options = &self.working.date_options;
        Ok(self
            .working
            .votes
            .iter()
            .filter(|v| options.get(&v.date_option_id).is_some_and(|o| o.trip_id == trip_id))
            .cloned()
            .collect())
    }

    async fn delete_user_votes(&mut self, trip_id: i64, user_id: UserId) -> Result<u64> {
        let options = &self.working.date_options;
        let before = self.working.votes.len();
        self.working.votes.retain(|v| {
            !(v.user_id == user_id
                && options.get(&v.date_option_id).is_some_and(|o| o.trip_id == trip_id))
        });
        Ok((before - self.working.votes.len()) as u64)
    }

    async fn insert_gear(&mut self, item: &NewGearItem) -> Result<GearItem> {
        let now = Utc::now();
        let id = self.working.next_id();
        let row = GearItem {
            id,
            trip_id: item.trip_id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            assigned_to: None,
            notes: item.notes.clone(),
            packed: false,
            created_at: now,
            updated_at: now,
        };
        self.working.gear.insert(id, row.clone());
        Ok(row)
    }

    async fn get_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<Option<GearItem>> {
        Ok(self
            .working
            .gear
            .get(&gear_id)
            .filter(|g| g.trip_id == trip_id)
            .cloned())
    }

    async fn save_gear(&mut self, item: &GearItem) -> Result<GearItem> {
        let stored = self
            .working
            .gear
            .get_mut(&item.id)
            .filter(|g| g.trip_id == item.trip_id)
            .ok_or(CampBarError::GearItemNotFound {
                trip_id: item.trip_id,
                gear_id: item.id,
            })?;
        *stored = GearItem {
            updated_at: Utc::now(),
            created_at: stored.created_at,
            ..item.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_gear(&mut self, trip_id: i64, gear_id: i64) -> Result<bool> {
        if self.get_gear(trip_id, gear_id).await?.is_none() {
            return Ok(false);
        }
        self.working.gear.remove(&gear_id);
        Ok(true)
    }

    async fn list_gear(&mut self, trip_id: i64) -> Result<Vec<GearItem>> {
        let mut items: Vec<GearItem> = self
            .working
            .gear
            .values()
            .filter(|g| g.trip_id == trip_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn release_user_gear(&mut self, trip_id: i64, user_id: UserId) -> Result<u64> {
        let now = Utc::now();
        let mut released = 0;
        for item in self.working.gear.values_mut() {
            if item.trip_id == trip_id && item.assigned_to == Some(user_id) {
                item.assigned_to = None;
                item.packed = false;
                item.updated_at = now;
                released += 1;
            }
        }
        Ok(released)
    }

    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message> {
        let id = self.working.next_id();
        let row = Message {
            id,
            trip_id: message.trip_id,
            author_id: message.author_id,
            text: message.text.clone(),
            created_at: Utc::now(),
        };
        self.working.messages.insert(id, row.clone());
        Ok(row)
    }

    async fn list_messages(&mut self, trip_id: i64) -> Result<Vec<Message>> {
        let mut messages: Vec<Message> = self
            .working
            .messages
            .values()
            .filter(|m| m.trip_id == trip_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn insert_alert(&mut self, alert: &NewSosAlert) -> Result<SosAlert> {
        let id = self.working.next_id();
        let location = alert.location;
        let row = SosAlert {
            id,
            trip_id: alert.trip_id,
            sender_id: alert.sender_id,
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
            accuracy: location.and_then(|l| l.accuracy),
            message: alert.message.clone(),
            category: alert.category,
            battery_level: alert.battery_level,
            sent_at: Utc::now(),
            resolved: false,
            resolved_at: None,
            resolved_by: None,
        };
        self.working.alerts.insert(id, row.clone());
        Ok(row)
    }

    async fn get_alert(&mut self, trip_id: i64, alert_id: i64) -> Result<Option<SosAlert>> {
        Ok(self
            .working
            .alerts
            .get(&alert_id)
            .filter(|a| a.trip_id == trip_id)
            .cloned())
    }

    async fn save_alert(&mut self, alert: &SosAlert) -> Result<SosAlert> {
        let stored = self
            .working
            .alerts
            .get_mut(&alert.id)
            .filter(|a| a.trip_id == alert.trip_id)
            .ok_or(CampBarError::AlertNotFound {
                trip_id: alert.trip_id,
                alert_id: alert.id,
            })?;
        stored.resolved = alert.resolved;
        stored.resolved_at = alert.resolved_at;
        stored.resolved_by = alert.resolved_by;
        Ok(stored.clone())
    }

    async fn list_alerts(&mut self, trip_id: i64, active_only: bool) -> Result<Vec<SosAlert>> {
        let mut alerts: Vec<SosAlert> = self
            .working
            .alerts
            .values()
            .filter(|a| a.trip_id == trip_id && (!active_only || !a.resolved))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
        Ok(alerts)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTripTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
