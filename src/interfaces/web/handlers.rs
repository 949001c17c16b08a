use super::models::SystemInfo;
use super::state::AppState;
use axum::{Json, extract::State};
use std::sync::Arc;

/// Liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// Get system information
pub async fn get_system_info(State(state): State<Arc<AppState>>) -> Json<SystemInfo> {
    let uptime = state.started_at.elapsed();
    let started_at = chrono::Utc::now()
        - chrono::Duration::from_std(uptime).unwrap_or_else(|_| chrono::Duration::zero());

    Json(SystemInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        provider: state.provider_name().to_string(),
        started_at: started_at.to_rfc3339(),
        uptime_seconds: uptime.as_secs(),
    })
}
