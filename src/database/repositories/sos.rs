//! SOS alert repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use crate::models::{NewSosAlert, SosAlert};
use crate::utils::errors::{CampBarError, Result};

pub struct SosRepository;

impl SosRepository {
    pub async fn insert(conn: &mut PgConnection, alert: &NewSosAlert) -> Result<SosAlert> {
        let location = alert.location;
        let alert = sqlx::query_as::<_, SosAlert>(
            r#"
            INSERT INTO sos_alerts (trip_id, sender_id, latitude, longitude, accuracy, message, category, battery_level, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, trip_id, sender_id, latitude, longitude, accuracy, message, category, battery_level, sent_at, resolved, resolved_at, resolved_by
            "#
        )
        .bind(alert.trip_id)
        .bind(alert.sender_id)
        .bind(location.map(|l| l.latitude))
        .bind(location.map(|l| l.longitude))
        .bind(location.and_then(|l| l.accuracy))
        .bind(&alert.message)
        .bind(alert.category)
        .bind(alert.battery_level)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(alert)
    }

    pub async fn find(conn: &mut PgConnection, trip_id: i64, alert_id: i64) -> Result<Option<SosAlert>> {
        let alert = sqlx::query_as::<_, SosAlert>(
            "SELECT id, trip_id, sender_id, latitude, longitude, accuracy, message, category, battery_level, sent_at, resolved, resolved_at, resolved_by FROM sos_alerts WHERE id = $1 AND trip_id = $2"
        )
        .bind(alert_id)
        .bind(trip_id)
        .fetch_optional(conn)
        .await?;

        Ok(alert)
    }

    /// Only the resolution columns change after an alert is raised
    pub async fn update_resolution(conn: &mut PgConnection, alert: &SosAlert) -> Result<SosAlert> {
        sqlx::query_as::<_, SosAlert>(
            r#"
            UPDATE sos_alerts
            SET resolved = $3, resolved_at = $4, resolved_by = $5
            WHERE id = $1 AND trip_id = $2
            RETURNING id, trip_id, sender_id, latitude, longitude, accuracy, message, category, battery_level, sent_at, resolved, resolved_at, resolved_by
            "#
        )
        .bind(alert.id)
        .bind(alert.trip_id)
        .bind(alert.resolved)
        .bind(alert.resolved_at)
        .bind(alert.resolved_by)
        .fetch_optional(conn)
        .await?
        .ok_or(CampBarError::AlertNotFound {
            trip_id: alert.trip_id,
            alert_id: alert.id,
        })
    }

    /// Newest first
    pub async fn list_for_trip(conn: &mut PgConnection, trip_id: i64, active_only: bool) -> Result<Vec<SosAlert>> {
        let alerts = sqlx::query_as::<_, SosAlert>(
            r#"
            SELECT id, trip_id, sender_id, latitude, longitude, accuracy, message, category, battery_level, sent_at, resolved, resolved_at, resolved_by
            FROM sos_alerts
            WHERE trip_id = $1 AND (NOT $2 OR resolved = FALSE)
            ORDER BY sent_at DESC, id DESC
            "#
        )
        .bind(trip_id)
        .bind(active_only)
        .fetch_all(conn)
        .await?;

        Ok(alerts)
    }
}
