//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts (where rows are created over HTTP)
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod measurement;
pub mod patient;
pub mod user;
