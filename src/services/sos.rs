//! SOS alerting service implementation
//!
//! Any member may raise an alert at any time, on any trip they belong to.
//! Alerts stay active until a member resolves them; clients poll the active
//! list. The attention sink is told about both edges after they are stored.

use std::sync::Arc;

use chrono::Utc;

use super::access::{fetch_trip, lock_trip, require_member};
use super::attention::AttentionSink;
use crate::database::TripStore;
use crate::models::{ActiveAlertsResponse, SendSosRequest, SosAlert, UserId};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::logging::log_sos_event;

#[derive(Clone)]
pub struct SosService {
    store: Arc<dyn TripStore>,
    attention: Arc<dyn AttentionSink>,
    poll_interval_seconds: u64,
}

impl SosService {
    pub fn new(store: Arc<dyn TripStore>, attention: Arc<dyn AttentionSink>, poll_interval_seconds: u64) -> Self {
        Self {
            store,
            attention,
            poll_interval_seconds,
        }
    }

    /// Store a new alert and request attention for it.
    ///
    /// Existing unresolved alerts never block a new one.
    pub async fn send(&self, trip_id: i64, user_id: UserId, request: SendSosRequest) -> Result<SosAlert> {
        let new_alert = request.into_new_alert(trip_id, user_id)?;

        let mut tx = self.store.begin().await?;
        let trip = fetch_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        let alert = tx.insert_alert(&new_alert).await?;
        tx.commit().await?;

        log_sos_event(trip_id, alert.id, "sent", user_id);
        self.attention.request_attention(&alert);
        Ok(alert)
    }

    /// Unresolved alerts, newest first
    pub async fn active(&self, trip_id: i64, user_id: UserId) -> Result<ActiveAlertsResponse> {
        let alerts = self.list(trip_id, user_id, true).await?;
        Ok(ActiveAlertsResponse {
            alerts,
            poll_interval_seconds: self.poll_interval_seconds,
        })
    }

    /// Every alert of the trip, newest first
    pub async fn history(&self, trip_id: i64, user_id: UserId) -> Result<Vec<SosAlert>> {
        self.list(trip_id, user_id, false).await
    }

    pub async fn resolve(&self, trip_id: i64, alert_id: i64, user_id: UserId) -> Result<SosAlert> {
        let mut tx = self.store.begin().await?;
        let trip = lock_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;

        let mut alert = tx
            .get_alert(trip_id, alert_id)
            .await?
            .ok_or(CampBarError::AlertNotFound { trip_id, alert_id })?;
        if alert.resolved {
            return Err(CampBarError::AlreadyResolved { alert_id });
        }

        alert.resolved = true;
        alert.resolved_at = Some(Utc::now());
        alert.resolved_by = Some(user_id);
        let alert = tx.save_alert(&alert).await?;
        tx.commit().await?;

        log_sos_event(trip_id, alert_id, "resolved", user_id);
        self.attention.clear_attention(&alert);
        Ok(alert)
    }

    async fn list(&self, trip_id: i64, user_id: UserId, active_only: bool) -> Result<Vec<SosAlert>> {
        let mut tx = self.store.begin().await?;
        let trip = fetch_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        tx.list_alerts(trip_id, active_only).await
    }
}
