//! Research orchestration
//!
//! Runs account lookup, insight generation and talk-track synthesis in
//! sequence, substituting local fallbacks for any provider that is missing or
//! failed, so a generation request always produces a complete result.

use std::sync::Arc;

use sdr_core::{ResearchResult, SaveOutcome, SaveResearchRequest};
use sdr_research::prompts::fallback_talk_track;
use sdr_research::{InsightProvider, Insights, SynthesisProvider};
use tracing::{debug, info, instrument, warn};

use crate::storage::AccountStore;

pub struct ResearchService {
    store: Arc<AccountStore>,
    insight_provider: Arc<dyn InsightProvider>,
    synthesis_provider: Arc<dyn SynthesisProvider>,
}

impl ResearchService {
    pub fn new(
        store: Arc<AccountStore>,
        insight_provider: Arc<dyn InsightProvider>,
        synthesis_provider: Arc<dyn SynthesisProvider>,
    ) -> Self {
        Self {
            store,
            insight_provider,
            synthesis_provider,
        }
    }

    /// Generate insights and a talk track for an account
    #[instrument(skip(self))]
    pub async fn generate_research(&self, account_name: &str) -> ResearchResult {
        let account_name = account_name.trim();

        // Unknown accounts are still researched by name
        match self.store.get_account_by_name(account_name).await {
            Some(account) => debug!("Researching known account {} ({})", account.name, account.id),
            None => info!("Account '{}' not found in store, researching by name", account_name),
        }

        let mut insights = self.insight_provider.generate_insights(account_name).await;
        if insights.is_empty() {
            warn!("No insights for {}, using placeholders", account_name);
            insights = Insights::placeholder(account_name);
        }

        let talk_track = match self
            .synthesis_provider
            .generate_talk_track(account_name, &insights)
            .await
        {
            Some(talk_track) => talk_track,
            None => {
                info!("Using fallback talk track for {}", account_name);
                fallback_talk_track(account_name)
            }
        };

        ResearchResult {
            success: true,
            industry_insights: insights.industry,
            company_insights: insights.company,
            vision_insights: insights.vision,
            recommended_talk_track: talk_track,
        }
    }

    /// Persist reviewed research; `user_id` overrides any `createdBy` in the body
    #[instrument(skip(self, request))]
    pub async fn save_research(
        &self,
        request: SaveResearchRequest,
        user_id: Option<String>,
    ) -> SaveOutcome {
        if let Some(field) = request.missing_field() {
            return SaveOutcome::failed(format!("Field '{}' is required", field));
        }

        let record = request.into_record(user_id);
        self.store.save_research(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sdr_core::ProviderConfig;
    use sdr_research::{OpenAIClient, PerplexityClient};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedInsights(Insights);

    #[async_trait]
    impl InsightProvider for FixedInsights {
        async fn generate_insights(&self, _company_name: &str) -> Insights {
            self.0.clone()
        }
    }

    /// Echoes the industry section so tests can see what synthesis received
    #[derive(Default)]
    struct EchoSynthesis {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SynthesisProvider for EchoSynthesis {
        async fn generate_talk_track(&self, company_name: &str, insights: &Insights) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(format!("Track for {}: {}", company_name, insights.industry))
        }
    }

    struct NoSynthesis;

    #[async_trait]
    impl SynthesisProvider for NoSynthesis {
        async fn generate_talk_track(&self, _company_name: &str, _insights: &Insights) -> Option<String> {
            None
        }
    }

    fn unconfigured(api_base: &str, model: &str) -> ProviderConfig {
        ProviderConfig {
            api_key: None,
            api_base: api_base.to_string(),
            model: model.to_string(),
        }
    }

    fn sample_insights() -> Insights {
        Insights {
            industry: "## Industry Insights\nGPU demand".to_string(),
            company: "## Company Information\nData center growth".to_string(),
            vision: "## Forward-Thinking Vision\nAI tooling".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_providers_yield_complete_fallback() {
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(PerplexityClient::new(&unconfigured("https://api.perplexity.ai", "sonar"))),
            Arc::new(OpenAIClient::new(&unconfigured("https://api.openai.com/v1", "gpt-3.5-turbo"))),
        );

        let result = service.generate_research("NVIDIA").await;

        assert!(result.success);
        for text in [
            &result.industry_insights,
            &result.company_insights,
            &result.vision_insights,
            &result.recommended_talk_track,
        ] {
            assert!(text.contains("NVIDIA"), "missing company name in {:?}", text);
        }
        assert!(result.industry_insights.starts_with("## Industry Insights"));
        assert!(result
            .recommended_talk_track
            .starts_with("# Personalized Talk Track for NVIDIA"));
    }

    #[tokio::test]
    async fn test_provider_output_passes_through() {
        let synthesis = Arc::new(EchoSynthesis::default());
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(FixedInsights(sample_insights())),
            synthesis.clone(),
        );

        let result = service.generate_research("  Acme Corporation ").await;

        assert!(result.success);
        assert_eq!(result.company_insights, "## Company Information\nData center growth");
        assert_eq!(
            result.recommended_talk_track,
            "Track for Acme Corporation: ## Industry Insights\nGPU demand"
        );
        assert_eq!(synthesis.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_insights_replaced_before_synthesis() {
        let synthesis = Arc::new(EchoSynthesis::default());
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(FixedInsights(Insights::empty())),
            synthesis.clone(),
        );

        let result = service.generate_research("Unlisted Co").await;

        assert!(result.industry_insights.contains("Unlisted Co"));
        assert!(result.recommended_talk_track.contains("would appear here"));
    }

    #[tokio::test]
    async fn test_missing_synthesis_uses_fallback_track() {
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(FixedInsights(sample_insights())),
            Arc::new(NoSynthesis),
        );

        let result = service.generate_research("Acme Corporation").await;
        assert_eq!(result.recommended_talk_track, fallback_talk_track("Acme Corporation"));
        assert_eq!(result.vision_insights, "## Forward-Thinking Vision\nAI tooling");
    }

    #[tokio::test]
    async fn test_save_requires_every_field() {
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(FixedInsights(Insights::empty())),
            Arc::new(NoSynthesis),
        );

        let request = SaveResearchRequest {
            account_id: Some("mock1".into()),
            account_name: Some("Acme Corporation".into()),
            ..Default::default()
        };
        let outcome = service.save_research(request, None).await;
        assert_eq!(outcome, SaveOutcome::failed("Field 'industryInsights' is required"));
    }

    #[tokio::test]
    async fn test_save_without_storage_reports_not_configured() {
        let service = ResearchService::new(
            Arc::new(AccountStore::new(None)),
            Arc::new(FixedInsights(Insights::empty())),
            Arc::new(NoSynthesis),
        );

        let request = SaveResearchRequest {
            account_id: Some("mock1".into()),
            account_name: Some("Acme Corporation".into()),
            industry_insights: Some("I".into()),
            company_insights: Some("C".into()),
            vision_insights: Some("V".into()),
            recommended_talk_track: Some("T".into()),
            created_by: None,
        };
        let outcome = service.save_research(request, Some("user1".into())).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("not configured"));
    }
}
