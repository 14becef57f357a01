//! HTTP handlers module
//!
//! JSON API over the trip engine. Every route except `/health` requires a
//! bearer token.

pub mod dates;
pub mod error;
pub mod extract;
pub mod gear;
pub mod messaging;
pub mod participation;
pub mod sos;
pub mod trips;

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::middleware::{log_requests, AuthService};
use crate::services::TripEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: TripEngine,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(engine: TripEngine, auth: AuthService) -> Self {
        Self { engine, auth }
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", get(trips::list_trips).post(trips::create_trip))
        .route(
            "/trips/:id",
            get(trips::get_trip)
                .put(trips::update_trip)
                .delete(trips::cancel_trip),
        )
        .route("/trips/:id/status", axum::routing::patch(trips::change_status))
        .route("/trips/:id/join", post(participation::join_trip))
        .route("/trips/:id/leave", delete(participation::leave_trip))
        .route(
            "/trips/:id/participation/confirm",
            post(participation::confirm_attendance),
        )
        .route(
            "/trips/:id/dates",
            get(dates::list_date_options).post(dates::add_date_option),
        )
        .route("/trips/:id/dates/:option_id", delete(dates::delete_date_option))
        .route(
            "/trips/:id/dates/:option_id/vote",
            post(dates::vote).delete(dates::unvote),
        )
        .route("/trips/:id/dates/:option_id/confirm", post(dates::confirm_date))
        .route("/trips/:id/gear", get(gear::list_gear).post(gear::add_gear))
        .route(
            "/trips/:id/gear/:gear_id",
            axum::routing::put(gear::update_gear).delete(gear::delete_gear),
        )
        .route("/trips/:id/gear/:gear_id/volunteer", post(gear::volunteer))
        .route("/trips/:id/gear/:gear_id/release", post(gear::release))
        .route("/trips/:id/gear/:gear_id/packed", post(gear::set_packed))
        .route(
            "/trips/:id/messages",
            get(messaging::list_messages).post(messaging::send_message),
        )
        .route("/trips/:id/sos", get(sos::alert_history).post(sos::send_sos))
        .route("/trips/:id/sos/active", get(sos::active_alerts))
        .route("/trips/:id/sos/:alert_id/resolve", post(sos::resolve_alert))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "version": crate::VERSION })),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "version": crate::VERSION })),
            )
        }
    }
}
