use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the store and report whether operations can currently succeed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let backend = state.storage_backend();
    match state.require_store() {
        Ok(store) => match store.health_check().await {
            Ok(()) => HealthResponse::ok(backend),
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthResponse::degraded(backend)
            }
        },
        Err(err) => {
            warn!(error = %err, "storage unavailable (degraded mode)");
            HealthResponse::degraded(backend)
        }
    }
}
