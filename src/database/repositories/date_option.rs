//! Date option and vote repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use super::is_unique_violation;
use crate::models::{CreateDateOptionRequest, DateOption, DateVote, UserId};
use crate::utils::errors::{CampBarError, Result};

pub struct DateOptionRepository;

impl DateOptionRepository {
    pub async fn insert(
        conn: &mut PgConnection,
        trip_id: i64,
        created_by: UserId,
        range: &CreateDateOptionRequest,
    ) -> Result<DateOption> {
        let option = sqlx::query_as::<_, DateOption>(
            r#"
            INSERT INTO date_options (trip_id, start_date, end_date, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, trip_id, start_date, end_date, created_by, created_at
            "#
        )
        .bind(trip_id)
        .bind(range.start_date)
        .bind(range.end_date)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(option)
    }

    pub async fn find(conn: &mut PgConnection, trip_id: i64, option_id: i64) -> Result<Option<DateOption>> {
        let option = sqlx::query_as::<_, DateOption>(
            "SELECT id, trip_id, start_date, end_date, created_by, created_at FROM date_options WHERE id = $1 AND trip_id = $2"
        )
        .bind(option_id)
        .bind(trip_id)
        .fetch_optional(conn)
        .await?;

        Ok(option)
    }

    /// Votes go with the option through the foreign key cascade
    pub async fn delete(conn: &mut PgConnection, trip_id: i64, option_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM date_options WHERE id = $1 AND trip_id = $2")
            .bind(option_id)
            .bind(trip_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_trip(conn: &mut PgConnection, trip_id: i64) -> Result<Vec<DateOption>> {
        let options = sqlx::query_as::<_, DateOption>(
            "SELECT id, trip_id, start_date, end_date, created_by, created_at FROM date_options WHERE trip_id = $1 ORDER BY start_date ASC, id ASC"
        )
        .bind(trip_id)
        .fetch_all(conn)
        .await?;

        Ok(options)
    }

    pub async fn insert_vote(conn: &mut PgConnection, option_id: i64, user_id: UserId) -> Result<DateVote> {
        let result = sqlx::query_as::<_, DateVote>(
            r#"
            INSERT INTO date_votes (date_option_id, user_id, voted_at)
            VALUES ($1, $2, $3)
            RETURNING date_option_id, user_id, voted_at
            "#
        )
        .bind(option_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await;

        match result {
            Ok(vote) => Ok(vote),
            Err(e) if is_unique_violation(&e) => Err(CampBarError::AlreadyVoted { option_id, user_id }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_vote(conn: &mut PgConnection, option_id: i64, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM date_votes WHERE date_option_id = $1 AND user_id = $2")
            .bind(option_id)
            .bind(user_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_votes_for_trip(conn: &mut PgConnection, trip_id: i64) -> Result<Vec<DateVote>> {
        let votes = sqlx::query_as::<_, DateVote>(
            r#"
            SELECT v.date_option_id, v.user_id, v.voted_at
            FROM date_votes v
            JOIN date_options o ON o.id = v.date_option_id
            WHERE o.trip_id = $1
            ORDER BY v.voted_at ASC
            "#
        )
        .bind(trip_id)
        .fetch_all(conn)
        .await?;

        Ok(votes)
    }

    pub async fn delete_user_votes(conn: &mut PgConnection, trip_id: i64, user_id: UserId) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM date_votes v
            USING date_options o
            WHERE v.date_option_id = o.id AND o.trip_id = $1 AND v.user_id = $2
            "#
        )
        .bind(trip_id)
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
