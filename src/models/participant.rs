//! Participant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UserId;

/// Membership status of a user on a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Interested,
    Confirmed,
    Waitlist,
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantStatus::Interested => write!(f, "interested"),
            ParticipantStatus::Confirmed => write!(f, "confirmed"),
            ParticipantStatus::Waitlist => write!(f, "waitlist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub trip_id: i64,
    pub user_id: UserId,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
    pub ticket_ref: Option<String>,
}

impl Participant {
    pub fn needs_ticket(&self) -> bool {
        self.status == ParticipantStatus::Confirmed && self.ticket_ref.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub trip_id: i64,
    pub user_id: UserId,
    pub status: ParticipantStatus,
}
