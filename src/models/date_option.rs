//! Date option and vote models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UserId;
use crate::utils::helpers::validate_date_range;
use crate::utils::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DateOption {
    pub id: i64,
    pub trip_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DateVote {
    pub date_option_id: i64,
    pub user_id: UserId,
    pub voted_at: DateTime<Utc>,
}

/// Date option with its tally, as shown to trip members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOptionSummary {
    #[serde(flatten)]
    pub option: DateOption,
    pub vote_count: i64,
    pub voters: Vec<UserId>,
}

impl DateOptionSummary {
    /// Tally `votes` for `option`; the count is the number of distinct voters
    pub fn tally(option: DateOption, votes: &[DateVote]) -> Self {
        let mut voters: Vec<UserId> = votes
            .iter()
            .filter(|vote| vote.date_option_id == option.id)
            .map(|vote| vote.user_id)
            .collect();
        voters.sort_unstable();
        voters.dedup();

        Self {
            vote_count: voters.len() as i64,
            voters,
            option,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDateOptionRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CreateDateOptionRequest {
    pub fn validate(&self) -> Result<()> {
        validate_date_range(self.start_date, self.end_date)
    }
}
