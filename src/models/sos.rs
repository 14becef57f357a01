//! SOS alert model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UserId;
use crate::utils::errors::{CampBarError, Result};
use crate::utils::helpers::normalize_optional_text;

const MAX_SOS_MESSAGE_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sos_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SosCategory {
    Medical,
    Lost,
    Security,
    Other,
}

impl Default for SosCategory {
    fn default() -> Self {
        SosCategory::Other
    }
}

/// Position reported by the sender's device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters
    pub accuracy: Option<f64>,
}

impl GeoPoint {
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CampBarError::Validation("latitude must be between -90 and 90".to_string()));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CampBarError::Validation("longitude must be between -180 and 180".to_string()));
        }
        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(CampBarError::Validation("accuracy must be a non-negative number".to_string()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    pub id: i64,
    pub trip_id: i64,
    pub sender_id: UserId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub message: Option<String>,
    pub category: SosCategory,
    pub battery_level: Option<i32>,
    pub sent_at: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<UserId>,
}

impl SosAlert {
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
                accuracy: self.accuracy,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSosAlert {
    pub trip_id: i64,
    pub sender_id: UserId,
    pub location: Option<GeoPoint>,
    pub message: Option<String>,
    pub category: SosCategory,
    pub battery_level: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSosRequest {
    pub location: Option<GeoPoint>,
    pub message: Option<String>,
    #[serde(default)]
    pub category: SosCategory,
    pub battery_level: Option<i32>,
}

impl SendSosRequest {
    pub fn into_new_alert(self, trip_id: i64, sender_id: UserId) -> Result<NewSosAlert> {
        if let Some(location) = &self.location {
            location.validate()?;
        }
        if let Some(level) = self.battery_level {
            if !(0..=100).contains(&level) {
                return Err(CampBarError::Validation("batteryLevel must be between 0 and 100".to_string()));
            }
        }
        let message = normalize_optional_text(self.message);
        if message.as_ref().is_some_and(|m| m.chars().count() > MAX_SOS_MESSAGE_LENGTH) {
            return Err(CampBarError::Validation(format!(
                "message must be at most {} characters",
                MAX_SOS_MESSAGE_LENGTH
            )));
        }

        Ok(NewSosAlert {
            trip_id,
            sender_id,
            location: self.location,
            message,
            category: self.category,
            battery_level: self.battery_level,
        })
    }
}

/// Response of the polled active-alert query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlertsResponse {
    pub alerts: Vec<SosAlert>,
    /// Advisory client poll interval; bounds how stale the list may be
    pub poll_interval_seconds: u64,
}
