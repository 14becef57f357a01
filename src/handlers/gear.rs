//! Gear handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{JsonBody, PathParams};
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::{CreateGearRequest, GearCategoryGroup, GearItem, SetPackedRequest, UpdateGearRequest};
use crate::utils::errors::Result;

pub async fn list_gear(
    State(state): State<AppState>,
    _user: CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Vec<GearCategoryGroup>>> {
    Ok(Json(state.engine.gear.list_grouped(trip_id).await?))
}

pub async fn add_gear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<CreateGearRequest>,
) -> Result<(StatusCode, Json<GearItem>)> {
    let item = state.engine.gear.add(trip_id, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_gear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, gear_id)): PathParams<(i64, i64)>,
    JsonBody(request): JsonBody<UpdateGearRequest>,
) -> Result<Json<GearItem>> {
    Ok(Json(state.engine.gear.update(trip_id, gear_id, user_id, request).await?))
}

pub async fn delete_gear(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, gear_id)): PathParams<(i64, i64)>,
) -> Result<StatusCode> {
    state.engine.gear.delete(trip_id, gear_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn volunteer(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, gear_id)): PathParams<(i64, i64)>,
) -> Result<Json<GearItem>> {
    Ok(Json(state.engine.gear.volunteer(trip_id, gear_id, user_id).await?))
}

pub async fn release(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, gear_id)): PathParams<(i64, i64)>,
) -> Result<Json<GearItem>> {
    Ok(Json(state.engine.gear.release(trip_id, gear_id, user_id).await?))
}

pub async fn set_packed(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, gear_id)): PathParams<(i64, i64)>,
    JsonBody(request): JsonBody<SetPackedRequest>,
) -> Result<Json<GearItem>> {
    Ok(Json(
        state
            .engine
            .gear
            .set_packed(trip_id, gear_id, user_id, request.packed)
            .await?,
    ))
}
