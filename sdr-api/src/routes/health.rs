//! Health check endpoints

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub(super) struct IndexResponse {
    name: &'static str,
    status: &'static str,
    version: &'static str,
}

/// API root, used by the frontend to check connectivity
pub(super) async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "SDR Assistant API",
        status: "operational",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    perplexity_configured: bool,
    openai_configured: bool,
}

/// Health check handler
///
/// Missing providers or storage only degrade output, so the server reports
/// healthy and lists what is configured.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        storage: state.store.backend_name().unwrap_or("mock"),
        perplexity_configured: state.config.is_perplexity_configured(),
        openai_configured: state.config.is_openai_configured(),
    })
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, test_app};

    #[tokio::test]
    async fn test_index_reports_operational() {
        for uri in ["/api", "/api/"] {
            let (status, body) = get(test_app(), uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["name"], "SDR Assistant API");
            assert_eq!(body["status"], "operational");
            assert!(body["version"].is_string());
        }
    }

    #[tokio::test]
    async fn test_health_lists_configuration() {
        let (status, body) = get(test_app(), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage"], "mock");
        assert_eq!(body["perplexityConfigured"], false);
        assert_eq!(body["openaiConfigured"], false);
    }

    #[tokio::test]
    async fn test_liveness() {
        let (status, _) = get(test_app(), "/api/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }
}
