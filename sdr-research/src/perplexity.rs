//! Perplexity chat-completion client (insight provider)

use async_trait::async_trait;
use reqwest::Client;
use sdr_core::{ProviderConfig, SdrError};
use tracing::{debug, info, instrument, warn};

use crate::chat::{content_from_body, ChatCompletionRequest, ChatMessage};
use crate::insights::Insights;
use crate::prompts::{insight_prompt, metadata_prompt, INSIGHT_SYSTEM_PROMPT, METADATA_SYSTEM_PROMPT};
use crate::provider::{InsightProvider, MetadataProvider};

#[derive(Debug, Clone)]
pub struct PerplexityClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl PerplexityClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Check if the client is configured (has an API key)
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one chat-completion request and return the first message content
    ///
    /// Single attempt; any non-2xx status or unreadable body is an error.
    #[instrument(skip(self, system_prompt, user_prompt))]
    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, SdrError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SdrError::config("PERPLEXITY_API_KEY not set"))?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: None,
            max_tokens: None,
        };

        debug!("Sending Perplexity request ({} prompt chars)", user_prompt.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SdrError::network(format!("Perplexity API request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SdrError::network(format!("Failed to read Perplexity response: {}", e)))?;

        if !status.is_success() {
            return Err(SdrError::api(format!("Perplexity API error ({}): {}", status, body)));
        }

        let content = content_from_body(&body)?;
        debug!("Perplexity returned {} characters", content.len());
        Ok(content)
    }
}

#[async_trait]
impl InsightProvider for PerplexityClient {
    async fn generate_insights(&self, company_name: &str) -> Insights {
        if !self.is_configured() {
            info!("Perplexity API key not configured, skipping insight generation");
            return Insights::empty();
        }

        match self.complete(INSIGHT_SYSTEM_PROMPT, &insight_prompt(company_name)).await {
            Ok(content) => Insights::from_content(&content),
            Err(e) => {
                warn!("Insight generation failed for {}: {}", company_name, e);
                Insights::empty()
            }
        }
    }
}

#[async_trait]
impl MetadataProvider for PerplexityClient {
    async fn company_metadata_text(&self, company_name: &str) -> Option<String> {
        if !self.is_configured() {
            return None;
        }

        match self.complete(METADATA_SYSTEM_PROMPT, &metadata_prompt(company_name)).await {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Metadata request failed for {}: {}", company_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_server;
    use reqwest::{Method, StatusCode};

    fn unconfigured() -> PerplexityClient {
        PerplexityClient::new(&ProviderConfig {
            api_key: None,
            api_base: "https://api.perplexity.ai/".to_string(),
            model: "sonar".to_string(),
        })
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(unconfigured().base_url, "https://api.perplexity.ai");
    }

    #[tokio::test]
    async fn test_unconfigured_client_returns_sentinel() {
        let client = unconfigured();
        assert!(!client.is_configured());
        assert!(client.generate_insights("NVIDIA").await.is_empty());
        assert!(client.company_metadata_text("NVIDIA").await.is_none());
    }

    #[tokio::test]
    async fn test_complete_without_key_is_config_error() {
        let err = unconfigured().complete("sys", "user").await.unwrap_err();
        assert!(matches!(err, SdrError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_sentinel() {
        let client = PerplexityClient::new(&ProviderConfig {
            api_key: Some("test-key".to_string()),
            api_base: "http://127.0.0.1:9".to_string(),
            model: "sonar".to_string(),
        });
        assert!(client.generate_insights("NVIDIA").await.is_empty());
    }

    fn client_for(base_url: &str) -> PerplexityClient {
        PerplexityClient::new(&ProviderConfig {
            api_key: Some("test-key".to_string()),
            api_base: base_url.to_string(),
            model: "sonar".to_string(),
        })
    }

    #[tokio::test]
    async fn test_server_error_returns_sentinel() {
        let (base_url, log) = stub_server::serve(|_, _| {
            (StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "overloaded"}"#.to_string())
        })
        .await;
        let client = client_for(&base_url);

        let err = client.complete("sys", "user").await.unwrap_err();
        assert!(matches!(err, SdrError::Api(_)));
        assert!(client.generate_insights("NVIDIA").await.is_empty());
        assert!(client.company_metadata_text("NVIDIA").await.is_none());
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_html_body_returns_sentinel() {
        let (base_url, _log) = stub_server::serve(|_, _| {
            (StatusCode::OK, "<html><body>Bad gateway</body></html>".to_string())
        })
        .await;
        let client = client_for(&base_url);

        assert!(client.generate_insights("NVIDIA").await.is_empty());
        assert!(client.company_metadata_text("NVIDIA").await.is_none());
    }

    #[tokio::test]
    async fn test_insights_from_completion() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "## Industry Insights\nChips.\n## Company Information\nGPUs.\n## Forward-Thinking Vision\nAgents."}}]
        })
        .to_string();
        let (base_url, log) = stub_server::serve(move |_, _| (StatusCode::OK, body.clone())).await;

        let insights = client_for(&format!("{}/", base_url))
            .generate_insights("NVIDIA")
            .await;
        assert_eq!(insights.industry, "## Industry Insights\nChips.");
        assert_eq!(insights.vision, "## Forward-Thinking Vision\nAgents.");

        let requests = log.lock().unwrap();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].uri.path(), "/chat/completions");
        assert!(requests[0].query().is_empty());
        assert!(requests[0].body.contains(r#""model":"sonar""#));
        assert!(requests[0].body.contains("NVIDIA"));
    }
}
