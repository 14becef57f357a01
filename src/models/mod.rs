//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod trip;
pub mod participant;
pub mod date_option;
pub mod gear;
pub mod message;
pub mod sos;

/// Identity supplied by the authentication collaborator
pub type UserId = i64;

// Re-export commonly used models
pub use trip::{Trip, TripStatus, Difficulty, NewTrip, CreateTripRequest, UpdateTripRequest, StatusChangeRequest, TripFilter, TripDetail};
pub use participant::{Participant, ParticipantStatus, NewParticipant};
pub use date_option::{DateOption, DateVote, DateOptionSummary, CreateDateOptionRequest};
pub use gear::{GearItem, NewGearItem, CreateGearRequest, UpdateGearRequest, SetPackedRequest, GearCategoryGroup};
pub use message::{Message, NewMessage, SendMessageRequest};
pub use sos::{SosAlert, SosCategory, GeoPoint, NewSosAlert, SendSosRequest, ActiveAlertsResponse};
