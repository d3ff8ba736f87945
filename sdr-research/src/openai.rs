//! OpenAI client for talk-track synthesis

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use sdr_core::{ProviderConfig, SdrError};
use tracing::{info, instrument, warn};

use crate::insights::Insights;
use crate::prompts::{talk_track_prompt, TALK_TRACK_SYSTEM_PROMPT};
use crate::provider::SynthesisProvider;

#[derive(Debug, Clone)]
pub struct OpenAIClient {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAIClient {
    /// Build a client from provider settings
    ///
    /// Without an API key no client is created and every call short-circuits.
    pub fn new(config: &ProviderConfig) -> Self {
        let client = config.api_key.as_ref().map(|key| {
            let openai_config = OpenAIConfig::new()
                .with_api_key(key.clone())
                .with_api_base(config.api_base.trim_end_matches('/').to_string());
            Client::with_config(openai_config)
        });

        Self {
            client,
            model: config.model.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    #[instrument(skip(self, insights))]
    pub async fn request_talk_track(
        &self,
        company_name: &str,
        insights: &Insights,
    ) -> Result<String, SdrError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| SdrError::config("OPENAI_API_KEY not set"))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(TALK_TRACK_SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| SdrError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(talk_track_prompt(company_name, insights))
                    .build()
                    .map_err(|e| SdrError::internal(e.to_string()))?
                    .into(),
            ])
            .temperature(0.7)
            .max_tokens(1000u32)
            .build()
            .map_err(|e| SdrError::internal(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| SdrError::api(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SdrError::parse("No response from OpenAI"))
    }
}

#[async_trait]
impl SynthesisProvider for OpenAIClient {
    async fn generate_talk_track(&self, company_name: &str, insights: &Insights) -> Option<String> {
        if !self.is_configured() {
            info!("OpenAI API key not configured, skipping talk track synthesis");
            return None;
        }

        match self.request_talk_track(company_name, insights).await {
            Ok(talk_track) => {
                info!("Generated talk track for {} ({} chars)", company_name, talk_track.len());
                Some(talk_track)
            }
            Err(e) => {
                warn!("Talk track synthesis failed for {}: {}", company_name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_client_returns_none() {
        let client = OpenAIClient::new(&ProviderConfig {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        });
        assert!(!client.is_configured());

        let insights = Insights::placeholder("Acme");
        assert!(client.generate_talk_track("Acme", &insights).await.is_none());
        assert!(matches!(
            client.request_talk_track("Acme", &insights).await,
            Err(SdrError::Config(_))
        ));
    }
}
