//! Trip chat handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{JsonBody, PathParams};
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::{Message, SendMessageRequest};
use crate::utils::errors::Result;

pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Vec<Message>>> {
    Ok(Json(state.engine.messaging.list(trip_id, user_id).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let message = state.engine.messaging.send(trip_id, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
