//! Domain logic for the Wardwatch patient-management backend.
//!
//! Nothing in this crate touches the network or the database. Persistence is
//! reached through the traits in [`ingestion`], which the `wardwatch-db`
//! crate implements over a Postgres pool.

pub mod error;
pub mod ingestion;
pub mod measurement;
pub mod patient;
pub mod search;
pub mod thresholds;
pub mod types;
