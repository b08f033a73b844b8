//! Root and health probe handlers

use crate::api::AdminState;
use crate::health::{HealthState, HealthStatus};
use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

pub async fn root() -> &'static str {
    info!("📍 Root endpoint accessed");
    "Payment gateway settings backend"
}

/// Full dependency check. A degraded cache still answers 200.
pub async fn health(
    State(state): State<AdminState>,
) -> Result<Json<HealthStatus>, (StatusCode, String)> {
    info!("🏥 Health check requested");
    let health_status = state.health.check_health().await;

    if health_status.status == HealthState::Unhealthy {
        error!("❌ Health check failed - service unhealthy");
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable".to_string(),
        ))
    } else {
        info!("✅ Health check passed");
        Ok(Json(health_status))
    }
}

/// Readiness probe - checks if the service is ready to accept traffic
pub async fn readiness(
    state: State<AdminState>,
) -> Result<Json<HealthStatus>, (StatusCode, String)> {
    info!("🔍 Readiness probe requested");
    health(state).await
}

/// Liveness probe - the process is up
pub async fn liveness() -> &'static str {
    "OK"
}
