use serde::Serialize;

use crate::utils::Envelope;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Liveness check, wrapped in the same envelope as every other route
pub async fn health_check() -> Envelope<HealthResponse> {
    Envelope::with_result(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
