//! SDR Research Assistant API Server
//!
//! HTTP API that generates account research (Perplexity insights + OpenAI talk
//! tracks), stores it in Supabase or Airtable and serves company metadata.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use sdr_core::AppConfig;
use sdr_research::{OpenAIClient, PerplexityClient};
use sdr_services::{AccountStore, LibraryService, MetadataService, ResearchService};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<AccountStore>,
    pub research_service: Arc<ResearchService>,
    pub metadata_service: Arc<MetadataService>,
    pub library_service: Arc<LibraryService>,
}

impl AppState {
    /// Wire every service from configuration
    pub fn from_config(config: AppConfig) -> Self {
        let perplexity = Arc::new(PerplexityClient::new(&config.perplexity));
        let openai = Arc::new(OpenAIClient::new(&config.openai));
        let store = Arc::new(AccountStore::from_config(&config));

        let research_service = Arc::new(ResearchService::new(
            store.clone(),
            perplexity.clone(),
            openai,
        ));
        let metadata_service = Arc::new(MetadataService::new(perplexity));

        Self {
            config: Arc::new(config),
            store,
            research_service,
            metadata_service,
            library_service: Arc::new(LibraryService::new()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables; missing files are not an error
    for file in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(file) {
            if !matches!(e, dotenvy::Error::Io(_)) {
                eprintln!("Warning: Failed to load {}: {}", file, e);
            }
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sdr_api=debug")),
        )
        .init();

    info!("Starting SDR Research Assistant API");

    let config = AppConfig::from_env();

    if config.is_perplexity_configured() {
        info!("Perplexity configured (model {})", config.perplexity.model);
    } else {
        info!("PERPLEXITY_API_KEY not set - insights will use placeholders");
    }
    if config.is_openai_configured() {
        info!("OpenAI configured (model {})", config.openai.model);
    } else {
        info!("OPENAI_API_KEY not set - talk tracks will use the fallback template");
    }

    let port = config.port;
    let state = AppState::from_config(config);
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
