//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or a borrowed connection, for work that must join
//! a caller's transaction) as the first argument.

pub mod measurement_repo;
pub mod patient_repo;
pub mod user_repo;

pub use measurement_repo::MeasurementRepo;
pub use patient_repo::PatientRepo;
pub use user_repo::UserRepo;
