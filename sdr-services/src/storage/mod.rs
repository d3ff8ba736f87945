//! Account and research persistence
//!
//! The backend is resolved once from configuration: Supabase when its URL and
//! key are set, otherwise Airtable, otherwise none. Reads never fail (they fall
//! back to the mock accounts or `None`); writes report a [`SaveOutcome`].

mod airtable;
mod mock;
#[cfg(test)]
mod stub_server;
mod supabase;

use std::sync::Arc;

use async_trait::async_trait;
use sdr_core::{Account, AccountKey, AppConfig, ResearchRecord, SaveOutcome, SdrError, SdrResult};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

pub use airtable::AirtableBackend;
pub use mock::mock_accounts;
pub use supabase::SupabaseBackend;

/// A remote store for accounts and research records
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short backend name used in logs and errors
    fn name(&self) -> &'static str;

    async fn list_accounts(&self) -> SdrResult<Vec<Account>>;

    /// First research record stored for the account, if any
    async fn find_research(&self, key: &AccountKey) -> SdrResult<Option<ResearchRecord>>;

    async fn insert_research(&self, record: &ResearchRecord) -> SdrResult<()>;

    async fn update_research(&self, record_id: &str, record: &ResearchRecord) -> SdrResult<()>;
}

/// Facade over the active backend with the fallback rules applied
pub struct AccountStore {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl AccountStore {
    pub fn new(backend: Option<Arc<dyn StorageBackend>>) -> Self {
        Self { backend }
    }

    /// Pick the backend from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let backend: Option<Arc<dyn StorageBackend>> = if let Some(supabase) = &config.supabase {
            info!("Using Supabase storage at {}", supabase.url);
            Some(Arc::new(SupabaseBackend::new(supabase)))
        } else if let Some(airtable) = &config.airtable {
            info!(
                "Using Airtable storage (base {}, table {})",
                airtable.base_id, airtable.accounts_table
            );
            Some(Arc::new(AirtableBackend::new(airtable)))
        } else {
            info!("No storage backend configured, serving mock accounts");
            None
        };

        Self::new(backend)
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.name())
    }

    /// All accounts; the mock list when the backend is missing, failing or empty
    #[instrument(skip(self))]
    pub async fn get_accounts(&self) -> Vec<Account> {
        let Some(backend) = &self.backend else {
            return mock_accounts();
        };

        match backend.list_accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                debug!("Loaded {} accounts from {}", accounts.len(), backend.name());
                accounts
            }
            Ok(_) => {
                info!("{} returned no accounts, serving mock accounts", backend.name());
                mock_accounts()
            }
            Err(e) => {
                warn!("Failed to list accounts from {}: {}", backend.name(), e);
                mock_accounts()
            }
        }
    }

    /// Case-insensitive exact match on the account name
    pub async fn get_account_by_name(&self, name: &str) -> Option<Account> {
        self.get_accounts()
            .await
            .into_iter()
            .find(|account| account.matches_name(name))
    }

    pub async fn get_account_by_id(&self, id: &str) -> Option<Account> {
        let id = id.trim();
        self.get_accounts()
            .await
            .into_iter()
            .find(|account| account.id == id)
    }

    pub async fn get_research(&self, key: &AccountKey) -> Option<ResearchRecord> {
        let backend = self.backend.as_ref()?;
        match backend.find_research(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to load research for {}: {}", key.value(), e);
                None
            }
        }
    }

    /// Insert or update the research record for the record's account
    #[instrument(skip(self, record), fields(account = %record.account_name))]
    pub async fn save_research(&self, record: ResearchRecord) -> SaveOutcome {
        let Some(backend) = &self.backend else {
            return SaveOutcome::failed("Storage is not configured. Research was not saved.");
        };

        match upsert(backend.as_ref(), record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to save research to {}: {}", backend.name(), e);
                SaveOutcome::failed(e.to_string())
            }
        }
    }
}

async fn upsert(backend: &dyn StorageBackend, mut record: ResearchRecord) -> SdrResult<SaveOutcome> {
    match backend.find_research(&record.account_key()).await? {
        Some(existing) => {
            let record_id = existing.id.ok_or_else(|| {
                SdrError::storage(backend.name(), "existing research record has no id")
            })?;
            record.created_at = existing.created_at;
            if record.created_by.is_none() {
                record.created_by = existing.created_by;
            }
            backend.update_research(&record_id, &record).await?;
            info!("Updated research {} for {}", record_id, record.account_name);
            Ok(SaveOutcome::ok("Research updated successfully"))
        }
        None => {
            backend.insert_research(&record).await?;
            info!("Created research for {}", record.account_name);
            Ok(SaveOutcome::ok("Research created successfully"))
        }
    }
}

/// Employee counts arrive as numbers or strings like "26,000+"
pub(crate) fn employee_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => {
            let digits: String = s.chars().filter(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

/// Render a scalar cell as text; blank and null become `None`
pub(crate) fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
