//! Research generation for the SDR Research Assistant
//!
//! Perplexity supplies industry/company/vision insights and raw company
//! metadata, OpenAI turns insights into a talk track, and [`metadata`]
//! normalizes whatever the model returned into a fixed set of fields.

pub mod chat;
pub mod insights;
pub mod metadata;
pub mod openai;
pub mod perplexity;
pub mod prompts;
pub mod provider;
#[cfg(test)]
mod stub_server;

pub use chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use insights::Insights;
pub use metadata::{
    apply_vocabularies, default_metadata, normalize, normalize_with_stage, NormalizedMetadata,
    ParseStage, METADATA_FIELDS, UNKNOWN,
};
pub use openai::OpenAIClient;
pub use perplexity::PerplexityClient;
pub use provider::{InsightProvider, MetadataProvider, SynthesisProvider};
