//! Services module
//!
//! Business logic of the trip engine. Each service runs its operations as
//! units of work against the shared [`TripStore`].

pub mod access;
pub mod attention;
pub mod gear;
pub mod lifecycle;
pub mod messaging;
pub mod participation;
pub mod sos;
pub mod ticketing;
pub mod trips;
pub mod voting;

// Re-export commonly used services
pub use attention::{AttentionSink, TracingAttentionSink};
pub use gear::GearService;
pub use messaging::MessagingService;
pub use participation::ParticipationService;
pub use sos::SosService;
pub use ticketing::{HttpTicketIssuer, LocalTicketIssuer, TicketIssuer, TicketRequest, TicketingService};
pub use trips::TripService;
pub use voting::VotingService;

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::TripStore;
use crate::utils::errors::Result;

/// All trip services over one store
#[derive(Clone)]
pub struct TripEngine {
    pub trips: TripService,
    pub participation: ParticipationService,
    pub voting: VotingService,
    pub gear: GearService,
    pub sos: SosService,
    pub messaging: MessagingService,
    store: Arc<dyn TripStore>,
}

impl TripEngine {
    /// Create the engine with explicit collaborators
    pub fn new(
        store: Arc<dyn TripStore>,
        settings: &Settings,
        issuer: Arc<dyn TicketIssuer>,
        attention: Arc<dyn AttentionSink>,
    ) -> Self {
        let ticketing = TicketingService::new(store.clone(), issuer);

        Self {
            trips: TripService::new(store.clone()),
            participation: ParticipationService::new(store.clone(), ticketing.clone()),
            voting: VotingService::new(store.clone(), ticketing),
            gear: GearService::new(store.clone()),
            sos: SosService::new(store.clone(), attention, settings.sos.poll_interval_seconds),
            messaging: MessagingService::new(store.clone(), settings.messaging.max_message_length),
            store,
        }
    }

    /// Create the engine with the ticket issuer selected by `settings` and
    /// log-based attention signalling
    pub fn from_settings(store: Arc<dyn TripStore>, settings: &Settings) -> Result<Self> {
        let issuer = ticketing::issuer_from_config(&settings.ticketing)?;
        Ok(Self::new(store, settings, issuer, Arc::new(TracingAttentionSink)))
    }

    /// Check that the backing store is reachable
    pub async fn health_check(&self) -> Result<()> {
        self.store.health_check().await
    }
}
