use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and the config sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wardwatch_db::DbPool,
    /// Server configuration, including JWT settings and the threshold table.
    pub config: Arc<ServerConfig>,
}
