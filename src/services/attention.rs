//! Attention capability for SOS alerts
//!
//! Raising an alert asks every member's client to demand attention until the
//! alert is resolved. How a client does that (sound, vibration, banner) is
//! its own business; the engine only signals both edges.

use tracing::{info, warn};

use crate::models::SosAlert;

pub trait AttentionSink: Send + Sync {
    /// Called once an alert is durably stored
    fn request_attention(&self, alert: &SosAlert);

    /// Called once an alert is resolved
    fn clear_attention(&self, alert: &SosAlert);
}

/// Emits attention changes as log events
#[derive(Debug, Clone, Default)]
pub struct TracingAttentionSink;

impl AttentionSink for TracingAttentionSink {
    fn request_attention(&self, alert: &SosAlert) {
        warn!(
            trip_id = alert.trip_id,
            alert_id = alert.id,
            sender_id = alert.sender_id,
            category = ?alert.category,
            "Attention requested for SOS alert"
        );
    }

    fn clear_attention(&self, alert: &SosAlert) {
        info!(
            trip_id = alert.trip_id,
            alert_id = alert.id,
            resolved_by = alert.resolved_by,
            "Attention cleared for SOS alert"
        );
    }
}
