use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to Axum handlers via `State<AppState>`.
///
/// Entity routers carry their own service state; this holds what the
/// cross-cutting routes (health) need.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fleetops_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
