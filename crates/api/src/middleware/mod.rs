//! Request extractors that guard protected routes.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated staff user from a JWT Bearer token.

pub mod auth;
