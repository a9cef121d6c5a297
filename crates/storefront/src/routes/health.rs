//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Ready once a catalog with at least one shop has been loaded.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    if state.catalog().shops().is_empty() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

#[cfg(test)]
mod tests {
    use localazy_core::catalog::Catalog;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::content::ContentStore;

    #[tokio::test]
    async fn test_not_ready_without_shops() {
        let state = AppState::new(
            StorefrontConfig::default(),
            ContentStore::with_catalog(Catalog::new(Vec::new())),
        );
        assert_eq!(ready(State(state)).await, StatusCode::SERVICE_UNAVAILABLE);
    }
}
