use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::MessageResponse;
use crate::state::AppState;

pub async fn ping_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

/// Liveness plus database reachability and rate limiter counters.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = match state.repository().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            false
        }
    };

    let metrics = state.rate_limiter().metrics();
    let (status_code, status) = if database {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = json!({
        "status": status,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": database,
            "upload_dir": state.files().root().display().to_string(),
        },
        "rate_limiting": {
            "total_requests": metrics.total_requests,
            "rejected_requests": metrics.rejected_requests,
            "tracked_clients": metrics.tracked_clients,
            "rejection_rate": if metrics.total_requests > 0 {
                (metrics.rejected_requests as f64 / metrics.total_requests as f64 * 100.0).round() / 100.0
            } else {
                0.0
            }
        }
    });

    info!(status = status, database_available = database, "Health check completed");

    (status_code, Json(response))
}
