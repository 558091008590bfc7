//! Health check handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Body of `GET /health/detailed`.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` when every component is up, `"degraded"` otherwise.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `"up"` or `"down"` per registered component.
    pub components: BTreeMap<String, String>,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health/detailed
///
/// Answers `503` when any registered component is down.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealthResponse>) {
    let mut components = BTreeMap::new();
    let mut all_up = true;

    for check in &state.health_checks {
        let up = match check.check().await {
            Ok(up) => up,
            Err(e) => {
                warn!(component = check.component(), error = %e, "Health check failed");
                false
            }
        };
        all_up &= up;
        components.insert(
            check.component().to_string(),
            if up { "up" } else { "down" }.to_string(),
        );
    }

    let (status, label) = if all_up {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(DetailedHealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            components,
        }),
    )
}
