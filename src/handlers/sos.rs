//! SOS handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{JsonBody, PathParams};
use super::AppState;
use crate::middleware::CurrentUser;
use crate::models::{ActiveAlertsResponse, SendSosRequest, SosAlert};
use crate::utils::errors::Result;

pub async fn send_sos(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
    JsonBody(request): JsonBody<SendSosRequest>,
) -> Result<(StatusCode, Json<SosAlert>)> {
    let alert = state.engine.sos.send(trip_id, user_id, request).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn active_alerts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<ActiveAlertsResponse>> {
    Ok(Json(state.engine.sos.active(trip_id, user_id).await?))
}

pub async fn alert_history(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams(trip_id): PathParams<i64>,
) -> Result<Json<Vec<SosAlert>>> {
    Ok(Json(state.engine.sos.history(trip_id, user_id).await?))
}

pub async fn resolve_alert(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    PathParams((trip_id, alert_id)): PathParams<(i64, i64)>,
) -> Result<Json<SosAlert>> {
    Ok(Json(state.engine.sos.resolve(trip_id, alert_id, user_id).await?))
}
