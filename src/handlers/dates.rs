//! Date voting handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{JsonBody, PathParams};
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::{CreateDateOptionRequest, DateOptionSummary, Trip};
use crate::utils::errors::Result;

pub async fn list_date_options(
    State(state): State<AppState>,
    _user: CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Vec<DateOptionSummary>>> {
    Ok(Json(state.engine.voting.list_options(trip_id).await?))
}

pub async fn add_date_option(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<CreateDateOptionRequest>,
) -> Result<(StatusCode, Json<DateOptionSummary>)> {
    let option = state.engine.voting.add_option(trip_id, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(option)))
}

pub async fn delete_date_option(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, option_id)): PathParams<(i64, i64)>,
) -> Result<StatusCode> {
    state.engine.voting.delete_option(trip_id, option_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, option_id)): PathParams<(i64, i64)>,
) -> Result<Json<DateOptionSummary>> {
    Ok(Json(state.engine.voting.vote(trip_id, option_id, user_id).await?))
}

pub async fn unvote(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, option_id)): PathParams<(i64, i64)>,
) -> Result<Json<DateOptionSummary>> {
    Ok(Json(state.engine.voting.unvote(trip_id, option_id, user_id).await?))
}

pub async fn confirm_date(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, option_id)): PathParams<(i64, i64)>,
) -> Result<Json<Trip>> {
    Ok(Json(state.engine.voting.confirm(trip_id, option_id, user_id).await?))
}
