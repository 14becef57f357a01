//! Error handling for CampBar
//!
//! This module defines the main error type used throughout the engine
//! and the classification that the HTTP layer and callers rely on.

use thiserror::Error;

use crate::models::TripStatus;

/// Main error type for CampBar operations
#[derive(Error, Debug)]
pub enum CampBarError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ticketing error: {0}")]
    Ticketing(String),

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Trip not found: {trip_id}")]
    TripNotFound { trip_id: i64 },

    #[error("Date option {option_id} not found for trip {trip_id}")]
    DateOptionNotFound { trip_id: i64, option_id: i64 },

    #[error("Gear item {gear_id} not found for trip {trip_id}")]
    GearItemNotFound { trip_id: i64, gear_id: i64 },

    #[error("SOS alert {alert_id} not found for trip {trip_id}")]
    AlertNotFound { trip_id: i64, alert_id: i64 },

    #[error("User {user_id} is not a participant of trip {trip_id}")]
    ParticipantNotFound { trip_id: i64, user_id: i64 },

    #[error("Trip {trip_id} is not active (status: {status})")]
    TripNotActive { trip_id: i64, status: TripStatus },

    #[error("Voting is closed for trip {trip_id}")]
    VotingClosed { trip_id: i64 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: TripStatus, to: TripStatus },

    #[error("Operation requires trip status {expected}, found {actual}")]
    UnexpectedStatus { expected: TripStatus, actual: TripStatus },

    #[error("Trip {trip_id} is full")]
    TripFull { trip_id: i64 },

    #[error("User {user_id} already joined trip {trip_id}")]
    AlreadyParticipant { trip_id: i64, user_id: i64 },

    #[error("User {user_id} already voted for date option {option_id}")]
    AlreadyVoted { option_id: i64, user_id: i64 },

    #[error("User {user_id} has not voted for date option {option_id}")]
    NotVoted { option_id: i64, user_id: i64 },

    #[error("Gear item {gear_id} is already assigned to user {assigned_to}")]
    AlreadyAssigned { gear_id: i64, assigned_to: i64 },

    #[error("SOS alert {alert_id} is already resolved")]
    AlreadyResolved { alert_id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<config::ConfigError> for CampBarError {
    fn from(err: config::ConfigError) -> Self {
        CampBarError::Config(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CampBarError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CampBarError::Unauthorized(err.to_string())
    }
}

/// Result type alias for CampBar operations
pub type Result<T> = std::result::Result<T, CampBarError>;

/// Caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    InvalidState,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CampBarError {
    /// Classify the error into the kind surfaced to callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            CampBarError::Unauthorized(_) => ErrorKind::Unauthorized,
            CampBarError::Forbidden(_) => ErrorKind::Forbidden,
            CampBarError::TripNotFound { .. }
            | CampBarError::DateOptionNotFound { .. }
            | CampBarError::GearItemNotFound { .. }
            | CampBarError::AlertNotFound { .. }
            | CampBarError::ParticipantNotFound { .. } => ErrorKind::NotFound,
            CampBarError::TripNotActive { .. }
            | CampBarError::VotingClosed { .. }
            | CampBarError::InvalidStateTransition { .. }
            | CampBarError::UnexpectedStatus { .. } => ErrorKind::InvalidState,
            CampBarError::TripFull { .. }
            | CampBarError::AlreadyParticipant { .. }
            | CampBarError::AlreadyVoted { .. }
            | CampBarError::NotVoted { .. }
            | CampBarError::AlreadyAssigned { .. }
            | CampBarError::AlreadyResolved { .. }
            | CampBarError::Conflict(_) => ErrorKind::Conflict,
            CampBarError::Validation(_) => ErrorKind::Validation,
            CampBarError::Database(_)
            | CampBarError::Migration(_)
            | CampBarError::Http(_)
            | CampBarError::Serialization(_)
            | CampBarError::Io(_)
            | CampBarError::Config(_)
            | CampBarError::Ticketing(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Storage and collaborator failures collapse to a generic message so that
    /// driver detail never reaches the client.
    pub fn user_message(&self) -> String {
        match self {
            CampBarError::Unauthorized(_) => "Please sign in to continue".to_string(),
            CampBarError::Forbidden(reason) => reason.clone(),
            CampBarError::TripNotFound { .. } => "Trip not found".to_string(),
            CampBarError::DateOptionNotFound { .. } => "Date option not found".to_string(),
            CampBarError::GearItemNotFound { .. } => "Gear item not found".to_string(),
            CampBarError::AlertNotFound { .. } => "SOS alert not found".to_string(),
            CampBarError::ParticipantNotFound { .. } => "You are not a participant of this trip".to_string(),
            CampBarError::TripNotActive { status, .. } => format!("This trip is no longer active ({})", status),
            CampBarError::VotingClosed { .. } => "Voting is closed for this trip".to_string(),
            CampBarError::InvalidStateTransition { from, to } => {
                format!("A {} trip cannot be moved to {}", from, to)
            }
            CampBarError::UnexpectedStatus { expected, .. } => {
                format!("This is only possible once the trip is {}", expected)
            }
            CampBarError::TripFull { .. } => "This trip is full".to_string(),
            CampBarError::AlreadyParticipant { .. } => "You already joined this trip".to_string(),
            CampBarError::AlreadyVoted { .. } => "You already voted for these dates".to_string(),
            CampBarError::NotVoted { .. } => "You have not voted for these dates".to_string(),
            CampBarError::AlreadyAssigned { .. } => "Someone else is already bringing this item".to_string(),
            CampBarError::AlreadyResolved { .. } => "This alert was already resolved".to_string(),
            CampBarError::Conflict(reason) => reason.clone(),
            CampBarError::Validation(reason) => reason.clone(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }

    /// Check if the caller may retry the operation
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampBarError::Database(sqlx::Error::PoolTimedOut)
            | CampBarError::Database(sqlx::Error::Io(_)) => true,
            CampBarError::Http(_) => true,
            CampBarError::Io(_) => true,
            CampBarError::Ticketing(_) => true,
            _ => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Internal => match self {
                CampBarError::Database(_) | CampBarError::Migration(_) | CampBarError::Config(_) => {
                    ErrorSeverity::Critical
                }
                _ => ErrorSeverity::Error,
            },
            ErrorKind::Unauthorized | ErrorKind::Forbidden => ErrorSeverity::Warning,
            _ => ErrorSeverity::Info,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
