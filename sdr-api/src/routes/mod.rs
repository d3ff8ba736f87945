//! API route definitions

mod accounts;
mod health;
mod library;
mod metadata;
mod research;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(research::routes())
        .merge(metadata::routes())
        .merge(library::routes())
}

/// Full application: `/api` routes, CORS for the frontend, request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", api_routes())
        .route("/api", get(health::index))
        .route("/api/", get(health::index))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `{success, message}` body shared by every error and save response
#[derive(Debug, Serialize)]
struct MessageResponse {
    success: bool,
    message: String,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(MessageResponse {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

/// 400 for bodies that are missing, not JSON or the wrong shape
fn bad_body(rejection: JsonRejection) -> Response {
    failure(
        StatusCode::BAD_REQUEST,
        format!("Invalid request body: {}", rejection.body_text()),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use sdr_core::AppConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::AppState;

    /// App with no credentials: mock accounts, placeholder research, no storage
    pub fn test_app() -> Router {
        super::app(AppState::from_config(AppConfig::from_lookup(|_| None)))
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }
}
