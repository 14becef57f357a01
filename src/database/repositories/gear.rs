//! Gear repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use crate::models::{GearItem, NewGearItem, UserId};
use crate::utils::errors::{CampBarError, Result};

pub struct GearRepository;

impl GearRepository {
    pub async fn insert(conn: &mut PgConnection, item: &NewGearItem) -> Result<GearItem> {
        let item = sqlx::query_as::<_, GearItem>(
            r#"
            INSERT INTO gear_items (trip_id, name, category, quantity, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, trip_id, name, category, quantity, assigned_to, notes, packed, created_at, updated_at
            "#
        )
        .bind(item.trip_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.quantity)
        .bind(&item.notes)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(item)
    }

    pub async fn find(conn: &mut PgConnection, trip_id: i64, gear_id: i64) -> Result<Option<GearItem>> {
        let item = sqlx::query_as::<_, GearItem>(
            "SELECT id, trip_id, name, category, quantity, assigned_to, notes, packed, created_at, updated_at FROM gear_items WHERE id = $1 AND trip_id = $2"
        )
        .bind(gear_id)
        .bind(trip_id)
        .fetch_optional(conn)
        .await?;

        Ok(item)
    }

    pub async fn update(conn: &mut PgConnection, item: &GearItem) -> Result<GearItem> {
        sqlx::query_as::<_, GearItem>(
            r#"
            UPDATE gear_items
            SET name = $3,
                category = $4,
                quantity = $5,
                assigned_to = $6,
                notes = $7,
                packed = $8,
                updated_at = $9
            WHERE id = $1 AND trip_id = $2
            RETURNING id, trip_id, name, category, quantity, assigned_to, notes, packed, created_at, updated_at
            "#
        )
        .bind(item.id)
        .bind(item.trip_id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.quantity)
        .bind(item.assigned_to)
        .bind(&item.notes)
        .bind(item.packed)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?
        .ok_or(CampBarError::GearItemNotFound {
            trip_id: item.trip_id,
            gear_id: item.id,
        })
    }

    pub async fn delete(conn: &mut PgConnection, trip_id: i64, gear_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM gear_items WHERE id = $1 AND trip_id = $2")
            .bind(gear_id)
            .bind(trip_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_trip(conn: &mut PgConnection, trip_id: i64) -> Result<Vec<GearItem>> {
        let items = sqlx::query_as::<_, GearItem>(
            "SELECT id, trip_id, name, category, quantity, assigned_to, notes, packed, created_at, updated_at FROM gear_items WHERE trip_id = $1 ORDER BY category ASC, id ASC"
        )
        .bind(trip_id)
        .fetch_all(conn)
        .await?;

        Ok(items)
    }

    /// Unassign and unpack everything `user_id` carries on the trip
    pub async fn release_for_user(conn: &mut PgConnection, trip_id: i64, user_id: UserId) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE gear_items SET assigned_to = NULL, packed = FALSE, updated_at = $3 WHERE trip_id = $1 AND assigned_to = $2"
        )
        .bind(trip_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }
}
