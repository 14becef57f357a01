//! Database module
//!
//! Trip store abstraction and its PostgreSQL and in-memory implementations

pub mod connection;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations, health_check};
pub use memory::MemoryTripStore;
pub use postgres::PgTripStore;
pub use store::{TripStore, TripTx};
