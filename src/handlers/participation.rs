//! Participation handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::PathParams;
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::Participant;
use crate::utils::errors::Result;

pub async fn join_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<(StatusCode, Json<Participant>)> {
    let participant = state.engine.participation.join(trip_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn leave_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<StatusCode> {
    state.engine.participation.leave(trip_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_attendance(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Participant>> {
    Ok(Json(
        state
            .engine
            .participation
            .confirm_attendance(trip_id, user_id)
            .await?,
    ))
}
