//! Ticketing collaborator integration
//!
//! Confirmed participants of a confirmed trip get a ticket reference. The
//! reference comes either from the external ticketing service over HTTP or
//! from a local issuer that mints codes in-process. Issuance runs after the
//! triggering unit of work has committed and never fails that operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{TicketingConfig, TicketingMode};
use crate::database::TripStore;
use crate::models::{Participant, Trip, UserId};
use crate::utils::errors::{CampBarError, Result};
use crate::utils::helpers::generate_random_string;
use crate::utils::logging::log_api_error;

/// Data handed to the ticketing collaborator for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub trip_id: i64,
    pub user_id: UserId,
    pub trip_title: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TicketRequest {
    pub fn new(trip: &Trip, user_id: UserId) -> Self {
        Self {
            trip_id: trip.id,
            user_id,
            trip_title: trip.title.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TicketResponse {
    reference: String,
}

#[async_trait]
pub trait TicketIssuer: Send + Sync {
    /// Issue a ticket and return its reference
    async fn issue(&self, request: &TicketRequest) -> Result<String>;
}

/// Client for the external ticketing service
#[derive(Debug, Clone)]
pub struct HttpTicketIssuer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTicketIssuer {
    pub fn new(config: &TicketingConfig) -> Result<Self> {
        let base_url = config
            .api_url
            .as_deref()
            .ok_or_else(|| CampBarError::Config("Ticketing API URL is not configured".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("CampBar/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/tickets", base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl TicketIssuer for HttpTicketIssuer {
    async fn issue(&self, request: &TicketRequest) -> Result<String> {
        debug!(trip_id = request.trip_id, user_id = request.user_id, "Requesting ticket");

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            return Err(CampBarError::Ticketing(format!(
                "ticketing service responded with {}",
                response.status()
            )));
        }

        let body: TicketResponse = response.json().await?;
        if body.reference.trim().is_empty() {
            return Err(CampBarError::Ticketing("empty ticket reference".to_string()));
        }
        Ok(body.reference)
    }
}

/// Mints references of the form `CB-{trip}-{user}-{code}`
#[derive(Debug, Clone, Default)]
pub struct LocalTicketIssuer;

#[async_trait]
impl TicketIssuer for LocalTicketIssuer {
    async fn issue(&self, request: &TicketRequest) -> Result<String> {
        Ok(format!(
            "CB-{}-{}-{}",
            request.trip_id,
            request.user_id,
            generate_random_string(8)
        ))
    }
}

/// Build the issuer selected by configuration
pub fn issuer_from_config(config: &TicketingConfig) -> Result<Arc<dyn TicketIssuer>> {
    match config.mode {
        TicketingMode::Local => Ok(Arc::new(LocalTicketIssuer)),
        TicketingMode::Http => Ok(Arc::new(HttpTicketIssuer::new(config)?)),
    }
}

/// Issues tickets for participants and records the references
#[derive(Clone)]
pub struct TicketingService {
    store: Arc<dyn TripStore>,
    issuer: Arc<dyn TicketIssuer>,
}

impl TicketingService {
    pub fn new(store: Arc<dyn TripStore>, issuer: Arc<dyn TicketIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Issue tickets for every participant in `participants` still missing one.
    ///
    /// Failed issuances are logged and skipped. Returns the participants whose
    /// ticket reference was recorded.
    pub async fn issue_for(&self, trip: &Trip, participants: Vec<Participant>) -> Result<Vec<Participant>> {
        let pending: Vec<Participant> = participants
            .into_iter()
            .filter(Participant::needs_ticket)
            .collect();
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let requests: Vec<TicketRequest> = pending
            .iter()
            .map(|p| TicketRequest::new(trip, p.user_id))
            .collect();
        let results = join_all(requests.iter().map(|r| self.issuer.issue(r))).await;

        let mut tx = self.store.begin().await?;
        let mut issued = Vec::new();
        for (participant, result) in pending.into_iter().zip(results) {
            let reference = match result {
                Ok(reference) => reference,
                Err(e) => {
                    log_api_error("ticketing", &e.to_string(), Some(&format!("trip {}", trip.id)));
                    continue;
                }
            };

            // A concurrent issuance may have recorded a reference first, or the
            // participant may have left while the ticket was being issued
            match tx.record_ticket(trip.id, participant.user_id, &reference).await? {
                Some(recorded) => issued.push(recorded),
                None => warn!(
                    trip_id = trip.id,
                    user_id = participant.user_id,
                    "Ticket not recorded, participant already ticketed or gone"
                ),
            }
        }
        tx.commit().await?;

        info!(trip_id = trip.id, issued = issued.len(), "Tickets issued");
        Ok(issued)
    }
}
