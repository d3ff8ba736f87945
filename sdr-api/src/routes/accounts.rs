//! Account listing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use sdr_core::{Account, AccountKey, AccountSummary};
use tracing::debug;

use super::failure;
use crate::AppState;

/// `{id, name}` for every account (backend or mock)
async fn list_accounts(State(state): State<AppState>) -> Json<Vec<AccountSummary>> {
    let accounts = state.store.get_accounts().await;
    debug!("Returning {} account summaries", accounts.len());
    Json(accounts.iter().map(AccountSummary::from).collect())
}

/// Full account records
async fn account_details(State(state): State<AppState>) -> Json<Vec<Account>> {
    Json(state.store.get_accounts().await)
}

/// One account by its backend id
async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get_account_by_id(&id).await {
        Some(account) => Json(account).into_response(),
        None => failure(StatusCode::NOT_FOUND, format!("Account '{}' not found", id)),
    }
}

/// Research previously saved for an account id
async fn saved_research(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.store.get_research(&AccountKey::Id(id.trim().to_string())).await {
        Some(record) => Json(record).into_response(),
        None => failure(
            StatusCode::NOT_FOUND,
            format!("No saved research for account '{}'", id),
        ),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/list", get(list_accounts))
        .route("/accounts/details", get(account_details))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}/research", get(saved_research))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{get, test_app};

    #[tokio::test]
    async fn test_accounts_fall_back_to_mock_list() {
        for uri in ["/api/accounts", "/api/accounts/list"] {
            let (status, body) = get(test_app(), uri).await;
            assert_eq!(status, StatusCode::OK);

            let accounts = body.as_array().unwrap();
            assert_eq!(accounts.len(), 5);
            assert_eq!(accounts[0]["id"], "mock1");
            assert_eq!(accounts[0]["name"], "Acme Corporation");
            assert!(accounts[0].get("industry").is_none());
        }
    }

    #[tokio::test]
    async fn test_account_details_include_profile() {
        let (status, body) = get(test_app(), "/api/accounts/details").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[1]["name"], "TechGiant Inc");
        assert_eq!(body[1]["location"], "Seattle, WA");
        assert_eq!(body[1]["employees"], 10000);
    }

    #[tokio::test]
    async fn test_get_account_by_id() {
        let (status, body) = get(test_app(), "/api/accounts/mock3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Global Financial");

        let (status, body) = get(test_app(), "/api/accounts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_saved_research_without_storage_is_not_found() {
        let (status, body) = get(test_app(), "/api/accounts/mock1/research").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].as_str().unwrap().contains("mock1"));
    }
}
