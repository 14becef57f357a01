//! Trip model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{DateOptionSummary, GearItem, Message, Participant, UserId};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::helpers::{normalize_optional_text, require_text};

pub const MIN_PARTICIPANTS: i32 = 2;
pub const MAX_TITLE_LENGTH: usize = 120;

/// Lifecycle state of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planning,
    Confirmed,
    Ongoing,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Confirmed => "confirmed",
            TripStatus::Ongoing => "ongoing",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and cancelled trips accept no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TripStatus {
    type Err = CampBarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "planning" => Ok(TripStatus::Planning),
            "confirmed" => Ok(TripStatus::Confirmed),
            "ongoing" => Ok(TripStatus::Ongoing),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            other => Err(CampBarError::Validation(format!("Unknown trip status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trip_difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
    Expert,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Moderate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub status: TripStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_participants: i32,
    pub current_participants: i32,
    pub estimated_cost: Option<String>,
    pub dates_confirmed: bool,
    pub organizer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn is_organizer(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }
}

/// Validated trip fields ready for insertion
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub max_participants: i32,
    pub estimated_cost: Option<String>,
    pub organizer_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub title: String,
    pub destination: String,
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub max_participants: i32,
    pub estimated_cost: Option<String>,
}

impl CreateTripRequest {
    /// Validate the request and bind it to its organizer
    pub fn into_new_trip(self, organizer_id: UserId) -> Result<NewTrip> {
        let title = require_text("title", &self.title, MAX_TITLE_LENGTH)?;
        let destination = require_text("destination", &self.destination, MAX_TITLE_LENGTH)?;
        validate_max_participants(self.max_participants)?;

        Ok(NewTrip {
            title,
            destination,
            description: normalize_optional_text(self.description),
            difficulty: self.difficulty,
            max_participants: self.max_participants,
            estimated_cost: normalize_optional_text(self.estimated_cost),
            organizer_id,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub max_participants: Option<i32>,
    pub estimated_cost: Option<String>,
}

impl UpdateTripRequest {
    /// Apply the requested edits onto `trip`.
    ///
    /// Capacity may not shrink below the number of people already on the trip.
    pub fn apply_to(self, trip: &mut Trip) -> Result<()> {
        if let Some(title) = self.title {
            trip.title = require_text("title", &title, MAX_TITLE_LENGTH)?;
        }
        if let Some(destination) = self.destination {
            trip.destination = require_text("destination", &destination, MAX_TITLE_LENGTH)?;
        }
        if let Some(description) = self.description {
            trip.description = normalize_optional_text(Some(description));
        }
        if let Some(difficulty) = self.difficulty {
            trip.difficulty = difficulty;
        }
        if let Some(max_participants) = self.max_participants {
            validate_max_participants(max_participants)?;
            if max_participants < trip.current_participants {
                return Err(CampBarError::Conflict(format!(
                    "Trip already has {} participants",
                    trip.current_participants
                )));
            }
            trip.max_participants = max_participants;
        }
        if let Some(estimated_cost) = self.estimated_cost {
            trip.estimated_cost = normalize_optional_text(Some(estimated_cost));
        }
        Ok(())
    }
}

fn validate_max_participants(max_participants: i32) -> Result<()> {
    if max_participants < MIN_PARTICIPANTS {
        return Err(CampBarError::Validation(format!(
            "maxParticipants must be at least {}",
            MIN_PARTICIPANTS
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: TripStatus,
}

/// Listing filter for `GET /trips`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TripFilter {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// In-process evaluation of the filter, mirroring the SQL predicate
    pub fn matches(&self, trip: &Trip) -> bool {
        if let Some(status) = self.status {
            if trip.status != status {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if trip.difficulty != difficulty {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            let haystacks = [
                Some(trip.title.as_str()),
                Some(trip.destination.as_str()),
                trip.description.as_deref(),
            ];
            return haystacks
                .iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&term));
        }
        true
    }
}

/// Trip with everything attached to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDetail {
    #[serde(flatten)]
    pub trip: Trip,
    pub participants: Vec<Participant>,
    pub date_options: Vec<DateOptionSummary>,
    pub gear: Vec<GearItem>,
    /// Only present for trip members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}
