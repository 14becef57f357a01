//! Participant repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use super::is_unique_violation;
use crate::models::{NewParticipant, Participant, UserId};
use crate::utils::errors::{CampBarError, Result};

pub struct ParticipantRepository;

impl ParticipantRepository {
    /// Add a participant row; a second row for the same user is a conflict
    pub async fn insert(conn: &mut PgConnection, participant: &NewParticipant) -> Result<Participant> {
        let result = sqlx::query_as::<_, Participant>(
            r#"
            INSERT INTO trip_participants (trip_id, user_id, status, joined_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, trip_id, user_id, status, joined_at, ticket_ref
            "#
        )
        .bind(participant.trip_id)
        .bind(participant.user_id)
        .bind(participant.status)
        .bind(Utc::now())
        .fetch_one(conn)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) if is_unique_violation(&e) => Err(CampBarError::AlreadyParticipant {
                trip_id: participant.trip_id,
                user_id: participant.user_id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find(conn: &mut PgConnection, trip_id: i64, user_id: UserId) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, user_id, status, joined_at, ticket_ref FROM trip_participants WHERE trip_id = $1 AND user_id = $2"
        )
        .bind(trip_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        Ok(participant)
    }

    pub async fn update(conn: &mut PgConnection, participant: &Participant) -> Result<Participant> {
        sqlx::query_as::<_, Participant>(
            r#"
            UPDATE trip_participants
            SET status = $2
            WHERE id = $1
            RETURNING id, trip_id, user_id, status, joined_at, ticket_ref
            "#
        )
        .bind(participant.id)
        .bind(participant.status)
        .fetch_optional(conn)
        .await?
        .ok_or(CampBarError::ParticipantNotFound {
            trip_id: participant.trip_id,
            user_id: participant.user_id,
        })
    }

    /// Store a ticket reference only if the row has none yet
    pub async fn record_ticket(
        conn: &mut PgConnection,
        trip_id: i64,
        user_id: UserId,
        reference: &str,
    ) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"
            UPDATE trip_participants
            SET ticket_ref = $3
            WHERE trip_id = $1 AND user_id = $2 AND ticket_ref IS NULL
            RETURNING id, trip_id, user_id, status, joined_at, ticket_ref
            "#
        )
        .bind(trip_id)
        .bind(user_id)
        .bind(reference)
        .fetch_optional(conn)
        .await?;

        Ok(participant)
    }

    pub async fn delete(conn: &mut PgConnection, trip_id: i64, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trip_participants WHERE trip_id = $1 AND user_id = $2")
            .bind(trip_id)
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Participants in join order
    pub async fn list_for_trip(conn: &mut PgConnection, trip_id: i64) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(
            "SELECT id, trip_id, user_id, status, joined_at, ticket_ref FROM trip_participants WHERE trip_id = $1 ORDER BY joined_at ASC, id ASC"
        )
        .bind(trip_id)
        .fetch_all(conn)
        .await?;

        Ok(participants)
    }
}
