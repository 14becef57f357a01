//! Test context for unified test setup
//!
//! Wires a [`TripEngine`] over a fresh [`MemoryTripStore`] with a ticket
//! issuer and an attention sink that record what they were asked to do.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use campbar::config::{DatabaseBackend, Settings};
use campbar::database::{MemoryTripStore, TripStore, TripTx};
use campbar::handlers::{router, AppState};
use campbar::middleware::AuthService;
use campbar::models::{Participant, SosAlert, Trip, UserId};
use campbar::services::{AttentionSink, TicketIssuer, TicketRequest, TripEngine};
use campbar::{CampBarError, Result};

use super::test_data::trip_request;

pub const TEST_JWT_SECRET: &str = "campbar-test-secret";

/// Attention sink that keeps every signal it receives
#[derive(Debug, Default)]
pub struct RecordingAttention {
    requested: Mutex<Vec<i64>>,
    cleared: Mutex<Vec<i64>>,
}

impl RecordingAttention {
    pub fn requested(&self) -> Vec<i64> {
        self.requested.lock().unwrap().clone()
    }

    pub fn cleared(&self) -> Vec<i64> {
        self.cleared.lock().unwrap().clone()
    }
}

impl AttentionSink for RecordingAttention {
    fn request_attention(&self, alert: &SosAlert) {
        self.requested.lock().unwrap().push(alert.id);
    }

    fn clear_attention(&self, alert: &SosAlert) {
        self.cleared.lock().unwrap().push(alert.id);
    }
}

/// Ticket issuer that records requests and can be switched to fail
#[derive(Debug, Default)]
pub struct RecordingIssuer {
    requests: Mutex<Vec<TicketRequest>>,
    failing: AtomicBool,
}

impl RecordingIssuer {
    pub fn requests(&self) -> Vec<TicketRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl TicketIssuer for RecordingIssuer {
    async fn issue(&self, request: &TicketRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(CampBarError::Ticketing("ticketing service unavailable".to_string()));
        }
        Ok(format!("TICKET-{}-{}", request.trip_id, request.user_id))
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub store: Arc<MemoryTripStore>,
    pub engine: TripEngine,
    pub auth: AuthService,
    pub attention: Arc<RecordingAttention>,
    pub issuer: Arc<RecordingIssuer>,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Self {
        crate::integration::init_test_logging();

        let settings = test_settings();
        let store = Arc::new(MemoryTripStore::new());
        let attention = Arc::new(RecordingAttention::default());
        let issuer = Arc::new(RecordingIssuer::default());
        let engine = TripEngine::new(
            store.clone() as Arc<dyn TripStore>,
            &settings,
            issuer.clone(),
            attention.clone(),
        );
        let auth = AuthService::new(&settings.auth);

        Self {
            store,
            engine,
            auth,
            attention,
            issuer,
            settings,
        }
    }

    /// Router over this context's engine
    pub fn router(&self) -> Router {
        router(AppState::new(self.engine.clone(), self.auth.clone()))
    }

    /// Bearer token for `user_id`, valid for an hour
    pub fn token(&self, user_id: UserId) -> String {
        self.auth
            .issue(user_id, chrono::Duration::hours(1))
            .expect("Failed to issue test token")
    }

    /// Create a trip organized by `organizer_id` with room for `max_participants`
    pub async fn create_trip(&self, organizer_id: UserId, max_participants: i32) -> Trip {
        self.engine
            .trips
            .create(organizer_id, trip_request(max_participants))
            .await
            .expect("Failed to create test trip")
    }

    /// Join every user in `user_ids` to the trip
    pub async fn join_all(&self, trip_id: i64, user_ids: &[UserId]) -> Vec<Participant> {
        let mut participants = Vec::new();
        for &user_id in user_ids {
            participants.push(
                self.engine
                    .participation
                    .join(trip_id, user_id)
                    .await
                    .expect("Failed to join test trip"),
            );
        }
        participants
    }

    pub async fn trip(&self, trip_id: i64, viewer_id: UserId) -> Trip {
        self.engine
            .trips
            .get_detail(trip_id, viewer_id)
            .await
            .expect("Failed to load test trip")
            .trip
    }

    pub async fn participant(&self, trip_id: i64, user_id: UserId) -> Option<Participant> {
        let mut tx = self.store.begin().await.expect("Failed to begin transaction");
        tx.find_participant(trip_id, user_id)
            .await
            .expect("Failed to load participant")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.backend = DatabaseBackend::Memory;
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.auth.issuer = Some("campbar-tests".to_string());
    settings.messaging.max_message_length = 200;
    settings.sos.poll_interval_seconds = 3;
    settings
}
