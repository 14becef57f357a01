//! Scenario tests
//!
//! Multi-step journeys across the services, each on a fresh in-memory store.

pub mod gear_test;
pub mod messaging_test;
pub mod participation_test;
