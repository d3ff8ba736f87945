//! Core types for the SDR Research Assistant
//!
//! This crate defines the shared data structures used across the assistant,
//! including accounts, research records, library entries, configuration and
//! the common error type.

pub mod account;
pub mod config;
pub mod error;
pub mod library;
pub mod research;

pub use account::{Account, AccountKey, AccountSummary};
pub use config::{AirtableConfig, AppConfig, ProviderConfig, SupabaseConfig};
pub use error::{SdrError, SdrResult};
pub use library::{LibraryEntry, NewLibraryEntry};
pub use research::{ResearchRecord, ResearchResult, SaveOutcome, SaveResearchRequest};
