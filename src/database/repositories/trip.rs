//! Trip repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use super::{violates_constraint, CAPACITY_CONSTRAINT};
use crate::models::{NewTrip, Trip, TripFilter};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::helpers::escape_like_pattern;

pub struct TripRepository;

impl TripRepository {
    /// Create a new trip in `planning`
    pub async fn insert(conn: &mut PgConnection, trip: &NewTrip) -> Result<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (title, destination, description, difficulty, max_participants, estimated_cost, organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, title, destination, description, difficulty, status, start_date, end_date, max_participants, current_participants, estimated_cost, dates_confirmed, organizer_id, created_at, updated_at
            "#
        )
        .bind(&trip.title)
        .bind(&trip.destination)
        .bind(&trip.description)
        .bind(trip.difficulty)
        .bind(trip.max_participants)
        .bind(&trip.estimated_cost)
        .bind(trip.organizer_id)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(trip)
    }

    /// Find trip by ID
    pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, title, destination, description, difficulty, status, start_date, end_date, max_participants, current_participants, estimated_cost, dates_confirmed, organizer_id, created_at, updated_at FROM trips WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(trip)
    }

    /// Find trip by ID and hold its row lock until the transaction ends
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(
            "SELECT id, title, destination, description, difficulty, status, start_date, end_date, max_participants, current_participants, estimated_cost, dates_confirmed, organizer_id, created_at, updated_at FROM trips WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(trip)
    }

    /// Write back every mutable column
    pub async fn update(conn: &mut PgConnection, trip: &Trip) -> Result<Trip> {
        let result = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips
            SET title = $2,
                destination = $3,
                description = $4,
                difficulty = $5,
                status = $6,
                start_date = $7,
                end_date = $8,
                max_participants = $9,
                current_participants = $10,
                estimated_cost = $11,
                dates_confirmed = $12,
                updated_at = $13
            WHERE id = $1
            RETURNING id, title, destination, description, difficulty, status, start_date, end_date, max_participants, current_participants, estimated_cost, dates_confirmed, organizer_id, created_at, updated_at
            "#
        )
        .bind(trip.id)
        .bind(&trip.title)
        .bind(&trip.destination)
        .bind(&trip.description)
        .bind(trip.difficulty)
        .bind(trip.status)
        .bind(trip.start_date)
        .bind(trip.end_date)
        .bind(trip.max_participants)
        .bind(trip.current_participants)
        .bind(&trip.estimated_cost)
        .bind(trip.dates_confirmed)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await;

        match result {
            Ok(Some(trip)) => Ok(trip),
            Ok(None) => Err(CampBarError::TripNotFound { trip_id: trip.id }),
            Err(e) if violates_constraint(&e, CAPACITY_CONSTRAINT) => Err(CampBarError::TripFull { trip_id: trip.id }),
            Err(e) => Err(e.into()),
        }
    }

    /// List trips matching `filter`, newest first
    pub async fn list(conn: &mut PgConnection, filter: &TripFilter) -> Result<Vec<Trip>> {
        let pattern = filter
            .search_term()
            .map(|term| format!("%{}%", escape_like_pattern(&term)));

        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT id, title, destination, description, difficulty, status, start_date, end_date, max_participants, current_participants, estimated_cost, dates_confirmed, organizer_id, created_at, updated_at
            FROM trips
            WHERE ($1::trip_status IS NULL OR status = $1)
              AND ($2::trip_difficulty IS NULL OR difficulty = $2)
              AND ($3::text IS NULL OR title ILIKE $3 OR destination ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4 OFFSET $5
            "#
        )
        .bind(filter.status)
        .bind(filter.difficulty)
        .bind(pattern)
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(conn)
        .await?;

        Ok(trips)
    }
}
