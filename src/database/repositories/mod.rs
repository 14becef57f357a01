//! Database repositories module
//!
//! SQL for each table, executed on the connection of an open transaction

pub mod trip;
pub mod participant;
pub mod date_option;
pub mod gear;
pub mod message;
pub mod sos;

// Re-export repositories
pub use trip::TripRepository;
pub use participant::ParticipantRepository;
pub use date_option::DateOptionRepository;
pub use gear::GearRepository;
pub use message::MessageRepository;
pub use sos::SosRepository;

const UNIQUE_VIOLATION: &str = "23505";

/// Name of the CHECK constraint bounding `current_participants` by capacity
pub(crate) const CAPACITY_CONSTRAINT: &str = "trips_capacity";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

pub(crate) fn violates_constraint(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some(constraint),
        _ => false,
    }
}
