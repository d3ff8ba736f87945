//! Knowledge library endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sdr_core::{LibraryEntry, NewLibraryEntry};
use serde::Serialize;
use tracing::warn;

use super::{bad_body, failure};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/library", get(list_entries))
        .route("/library/add", post(add_entry))
}

#[derive(Debug, Serialize)]
struct AddEntryResponse {
    success: bool,
    message: &'static str,
    entry: LibraryEntry,
}

async fn list_entries(State(state): State<AppState>) -> Json<Vec<LibraryEntry>> {
    Json(state.library_service.list_entries().await)
}

async fn add_entry(
    State(state): State<AppState>,
    body: Result<Json<NewLibraryEntry>, JsonRejection>,
) -> Response {
    let Json(new_entry) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };

    match state.library_service.add_entry(new_entry).await {
        Ok(entry) => Json(AddEntryResponse {
            success: true,
            message: "Library entry added successfully",
            entry,
        })
        .into_response(),
        Err(e) => {
            warn!("Rejected library entry: {}", e);
            failure(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, post_json, test_app};

    #[tokio::test]
    async fn test_list_seeded_entries() {
        let (status, body) = get(test_app(), "/api/library").await;
        assert_eq!(status, StatusCode::OK);

        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 5);
        assert!(entries[0]["dateAdded"].is_string());
        assert_eq!(entries[0]["category"], "News");
    }

    #[tokio::test]
    async fn test_add_entry() {
        let body = r#"{"title": "Q3 notes", "content": "Pipeline review", "category": "Research", "tags": ["pipeline"]}"#;
        let (status, json) = post_json(test_app(), "/api/library/add", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["entry"]["title"], "Q3 notes");
        assert_eq!(json["entry"]["tags"][0], "pipeline");
        assert!(json["entry"]["id"].is_string());
    }

    #[tokio::test]
    async fn test_add_entry_missing_tags() {
        let body = r#"{"title": "Q3 notes", "content": "Pipeline review", "category": "Research"}"#;
        let (status, json) = post_json(test_app(), "/api/library/add", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("tags is required"));
    }
}
