//! Local HTTP server standing in for Supabase and Airtable in tests

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    http::{header, Method, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;

/// A request received by the stub server
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub uri: Uri,
    pub body: String,
}

impl Received {
    pub fn query(&self) -> String {
        self.uri.query().unwrap_or_default().to_string()
    }
}

pub type RequestLog = Arc<Mutex<Vec<Received>>>;

/// Serve `respond` on an ephemeral port, returning its base URL and the request log
pub async fn serve<F>(respond: F) -> (String, RequestLog)
where
    F: Fn(&Method, &Uri) -> (StatusCode, String) + Clone + Send + Sync + 'static,
{
    let log: RequestLog = Arc::default();
    let recorder = log.clone();
    let app = Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
        let respond = respond.clone();
        let recorder = recorder.clone();
        async move {
            let (status, payload) = respond(&method, &uri);
            recorder.lock().unwrap().push(Received {
                method,
                uri,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
            (status, [(header::CONTENT_TYPE, "application/json")], payload)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), log)
}
