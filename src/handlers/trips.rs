//! Trip handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{JsonBody, PathParams, QueryParams};
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::{
    CreateTripRequest, StatusChangeRequest, Trip, TripDetail, TripFilter, UpdateTripRequest,
};
use crate::utils::errors::Result;

pub async fn list_trips(
    State(state): State<AppState>,
    _user: CurrentUser,
    QueryParams(filter): QueryParams<TripFilter>,
) -> Result<Json<Vec<Trip>>> {
    Ok(Json(state.engine.trips.list(&filter).await?))
}

pub async fn get_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<TripDetail>> {
    Ok(Json(state.engine.trips.get_detail(trip_id, user_id).await?))
}

pub async fn create_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    JsonBody(request): JsonBody<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>)> {
    let trip = state.engine.trips.create(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn update_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<UpdateTripRequest>,
) -> Result<Json<Trip>> {
    Ok(Json(state.engine.trips.update(trip_id, user_id, request).await?))
}

pub async fn cancel_trip(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Trip>> {
    Ok(Json(state.engine.trips.cancel(trip_id, user_id).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<StatusChangeRequest>,
) -> Result<Json<Trip>> {
    Ok(Json(
        state
            .engine
            .trips
            .change_status(trip_id, user_id, request.status)
            .await?,
    ))
}
