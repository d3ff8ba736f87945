//! Business logic services for the SDR Research Assistant
//!
//! This crate provides the account/research store with its backend fallback
//! rules, the research orchestrator, company metadata lookup and the
//! knowledge library.

pub mod library_service;
pub mod metadata_service;
pub mod research_service;
pub mod storage;

pub use library_service::LibraryService;
pub use metadata_service::MetadataService;
pub use research_service::ResearchService;
pub use storage::{mock_accounts, AccountStore, AirtableBackend, StorageBackend, SupabaseBackend};
