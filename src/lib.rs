//! CampBar trip engine
//!
//! Coordination and safety engine for group camping trips: trip lifecycle,
//! participant admission, date voting, gear bookkeeping, trip chat and an
//! SOS alert channel, served as a JSON API.

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampBarError, Result};

// Re-export main components for easy access
pub use database::{MemoryTripStore, PgTripStore, TripStore};
pub use handlers::{router, AppState};
pub use services::TripEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
