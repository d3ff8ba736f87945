//! Company metadata endpoint

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{bad_body, failure};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/company-metadata", post(company_metadata))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataRequest {
    #[serde(default)]
    company_name: Option<String>,
}

#[derive(Debug, Serialize)]
struct MetadataResponse {
    success: bool,
    metadata: BTreeMap<String, String>,
}

async fn company_metadata(
    State(state): State<AppState>,
    body: Result<Json<MetadataRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    let company_name = match request.company_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return failure(StatusCode::BAD_REQUEST, "Company name is required"),
    };

    let metadata = state.metadata_service.get_company_metadata(&company_name).await;
    Json(MetadataResponse {
        success: true,
        metadata,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sdr_research::{METADATA_FIELDS, UNKNOWN};

    use crate::routes::test_support::{post_json, test_app};

    #[tokio::test]
    async fn test_metadata_defaults_without_provider() {
        let (status, body) =
            post_json(test_app(), "/api/company-metadata", r#"{"companyName": "NVIDIA"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let metadata = body["metadata"].as_object().unwrap();
        assert_eq!(metadata.len(), METADATA_FIELDS.len());
        assert!(metadata.values().all(|v| v == UNKNOWN));
    }

    #[tokio::test]
    async fn test_metadata_requires_company_name() {
        let (status, body) = post_json(test_app(), "/api/company-metadata", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Company name is required");
    }
}
