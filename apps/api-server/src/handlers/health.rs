//! Health check endpoint.

use std::time::Duration;

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

const PROBE_KEY: &str = "health:probe";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub cache: &'static str,
    pub timestamp: String,
}

/// GET /api/health
///
/// Always 200 while the process serves requests; a failing cache only marks
/// the report as degraded.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let cache_ok = state
        .cache
        .set(PROBE_KEY, "ok", Some(Duration::from_secs(5)))
        .await
        .is_ok();

    HttpResponse::Ok().json(HealthResponse {
        status: if cache_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
        cache: if cache_ok { "ok" } else { "unavailable" },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
