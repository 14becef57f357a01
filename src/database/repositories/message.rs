//! Trip message repository implementation

use chrono::Utc;
use sqlx::PgConnection;

use crate::models::{Message, NewMessage};
use crate::utils::errors::Result;

pub struct MessageRepository;

impl MessageRepository {
    pub async fn insert(conn: &mut PgConnection, message: &NewMessage) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO trip_messages (trip_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, trip_id, author_id, text, created_at
            "#
        )
        .bind(message.trip_id)
        .bind(message.author_id)
        .bind(&message.text)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;

        Ok(message)
    }

    /// Oldest first; the serial id breaks timestamp ties in insertion order
    pub async fn list_for_trip(conn: &mut PgConnection, trip_id: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, trip_id, author_id, text, created_at FROM trip_messages WHERE trip_id = $1 ORDER BY created_at ASC, id ASC"
        )
        .bind(trip_id)
        .fetch_all(conn)
        .await?;

        Ok(messages)
    }
}
