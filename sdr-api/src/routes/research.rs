//! Research generation and persistence endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sdr_core::SaveResearchRequest;
use serde::Deserialize;
use tracing::info;

use super::{bad_body, failure, MessageResponse};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generate-research", post(generate_research))
        .route("/research", post(generate_research))
        .route("/save-research", post(save_research))
        .route("/save", post(save_research))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResearchRequest {
    #[serde(default)]
    account_name: Option<String>,
}

/// Generate insights and a talk track for `accountName`
async fn generate_research(
    State(state): State<AppState>,
    body: Result<Json<GenerateResearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    let account_name = match request.account_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return failure(StatusCode::BAD_REQUEST, "Account name is required"),
    };

    info!("Generating research for {}", account_name);
    let result = state.research_service.generate_research(&account_name).await;
    (StatusCode::OK, Json(result)).into_response()
}

/// Save reviewed research for an account
async fn save_research(
    State(state): State<AppState>,
    body: Result<Json<SaveResearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    if let Some(field) = request.missing_field() {
        return failure(
            StatusCode::BAD_REQUEST,
            format!("Field '{}' is required", field),
        );
    }

    let outcome = state.research_service.save_research(request, None).await;
    Json(MessageResponse {
        success: outcome.success,
        message: outcome.message,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{post_json, test_app};

    #[tokio::test]
    async fn test_generate_research_without_credentials() {
        for uri in ["/api/generate-research", "/api/research"] {
            let (status, body) = post_json(test_app(), uri, r#"{"accountName": "NVIDIA"}"#).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            for field in [
                "industryInsights",
                "companyInsights",
                "visionInsights",
                "recommendedTalkTrack",
            ] {
                assert!(
                    body[field].as_str().unwrap().contains("NVIDIA"),
                    "{} does not mention the company",
                    field
                );
            }
        }
    }

    #[tokio::test]
    async fn test_generate_research_requires_account_name() {
        for body in [r#"{}"#, r#"{"accountName": "   "}"#] {
            let (status, json) = post_json(test_app(), "/api/generate-research", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["success"], false);
            assert_eq!(json["message"], "Account name is required");
        }
    }

    #[tokio::test]
    async fn test_generate_research_rejects_malformed_json() {
        let (status, json) = post_json(test_app(), "/api/generate-research", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_save_research_names_missing_field() {
        let body = r#"{"accountId": "mock1", "accountName": "Acme Corporation", "industryInsights": "I"}"#;
        let (status, json) = post_json(test_app(), "/api/save-research", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Field 'companyInsights' is required");
    }

    #[tokio::test]
    async fn test_save_research_without_storage() {
        let body = r#"{
            "accountId": "mock1",
            "accountName": "Acme Corporation",
            "industryInsights": "I",
            "companyInsights": "C",
            "visionInsights": "V",
            "recommendedTalkTrack": "T"
        }"#;
        let (status, json) = post_json(test_app(), "/api/save", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_save_research_accepts_numeric_account_id() {
        let body = r#"{
            "accountId": 42,
            "accountName": "NVIDIA",
            "industryInsights": "I",
            "companyInsights": "C",
            "visionInsights": "V",
            "recommendedTalkTrack": "T"
        }"#;
        let (status, json) = post_json(test_app(), "/api/save-research", body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["message"].as_str().unwrap().contains("not configured"));
    }
}
