//! Liveness and storage check.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    /// `up` or `down`; absent for the in-memory store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
    pub timestamp: String,
}

/// GET /health/
///
/// 503 when the database is configured but unreachable.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = match &state.db {
        Some(db) => match db.ping().await {
            Ok(()) => Some("up"),
            Err(e) => {
                tracing::warn!(error = %e, "Health check could not reach the database");
                Some("down")
            }
        },
        None => None,
    };
    let healthy = database != Some("down");

    let response = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage(),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if healthy {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
