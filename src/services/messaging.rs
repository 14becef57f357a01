//! Trip chat service implementation

use std::sync::Arc;

use tracing::debug;

use super::access::{fetch_trip, require_member};
use super::lifecycle::ensure_active;
use crate::database::TripStore;
use crate::models::{Message, NewMessage, SendMessageRequest, UserId};
use crate::utils::errors::Result;
use crate::utils::helpers::require_text;

#[derive(Clone)]
pub struct MessagingService {
    store: Arc<dyn TripStore>,
    max_message_length: usize,
}

impl MessagingService {
    pub fn new(store: Arc<dyn TripStore>, max_message_length: usize) -> Self {
        Self {
            store,
            max_message_length,
        }
    }

    /// Append a message to the trip log
    pub async fn send(&self, trip_id: i64, user_id: UserId, request: SendMessageRequest) -> Result<Message> {
        let text = require_text("text", &request.text, self.max_message_length)?;

        let mut tx = self.store.begin().await?;
        let trip = fetch_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        ensure_active(&trip)?;

        let message = tx
            .insert_message(&NewMessage {
                trip_id,
                author_id: user_id,
                text,
            })
            .await?;
        tx.commit().await?;

        debug!(trip_id = trip_id, user_id = user_id, message_id = message.id, "Message posted");
        Ok(message)
    }

    /// Oldest first
    pub async fn list(&self, trip_id: i64, user_id: UserId) -> Result<Vec<Message>> {
        let mut tx = self.store.begin().await?;
        let trip = fetch_trip(tx.as_mut(), trip_id).await?;
        require_member(tx.as_mut(), &trip, user_id).await?;
        tx.list_messages(trip_id).await
    }
}
