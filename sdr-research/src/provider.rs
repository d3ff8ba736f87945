//! Provider seams used by the research orchestrator
//!
//! Implementations never return errors: failures collapse into the sentinel
//! values documented on each method so callers only choose a fallback.

use async_trait::async_trait;

use crate::insights::Insights;

/// Produces the three insight sections for a company
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Returns [`Insights::empty`] on any failure
    async fn generate_insights(&self, company_name: &str) -> Insights;
}

/// Turns insights into a formatted talk track
#[async_trait]
pub trait SynthesisProvider: Send + Sync {
    /// Returns `None` when unconfigured or when the request fails
    async fn generate_talk_track(&self, company_name: &str, insights: &Insights) -> Option<String>;
}

/// Raw (supposedly JSON) company metadata text
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Returns `None` when unconfigured or when the request fails
    async fn company_metadata_text(&self, company_name: &str) -> Option<String>;
}
