//! Liveness and database reachability probe.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"` when everything below is reachable, `"degraded"` otherwise.
    pub status: &'static str,
    /// `"reachable"` or `"unreachable"`.
    pub database: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /health. Reports degraded rather than failing when the pool is down,
/// so an orchestrator can tell a dead process from a dead database.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_reachable = fleetops_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_reachable { "ok" } else { "degraded" },
        database: if db_reachable {
            "reachable"
        } else {
            "unreachable"
        },
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_payload_serializes_expected_fields() {
        let payload = HealthResponse {
            status: "degraded",
            database: "unreachable",
            version: "0.0.0",
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["database"], "unreachable");
        assert_eq!(json["version"], "0.0.0");
    }
}
