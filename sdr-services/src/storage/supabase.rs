//! Supabase (PostgREST) storage backend

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use sdr_core::account::opaque_id;
use sdr_core::{Account, AccountKey, ResearchRecord, SdrError, SdrResult, SupabaseConfig};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{employee_count, text_value, StorageBackend};

const BACKEND: &str = "supabase";

/// Row of the `accounts` table; older rows use `headquarters`/`employees`
#[derive(Debug, Deserialize)]
struct AccountRow {
    #[serde(default, deserialize_with = "opaque_id")]
    id: String,
    #[serde(default)]
    name: String,
    industry: Option<String>,
    location: Option<String>,
    headquarters: Option<String>,
    employee_count: Option<Value>,
    employees: Option<Value>,
    revenue: Option<Value>,
    website: Option<String>,
    description: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        let employees = row
            .employee_count
            .as_ref()
            .and_then(employee_count)
            .or_else(|| row.employees.as_ref().and_then(employee_count));

        Account {
            id: row.id,
            name: row.name,
            industry: row.industry,
            location: row.location.or(row.headquarters),
            employees,
            revenue: row.revenue.as_ref().and_then(text_value),
            website: row.website,
            description: row.description,
        }
    }
}

pub struct SupabaseBackend {
    client: Client,
    rest_url: String,
    key: String,
}

impl SupabaseBackend {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            key: config.key.clone(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.key)
            .header("Authorization", format!("Bearer {}", self.key))
    }

    /// Send a request and return the body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> SdrResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| SdrError::storage(BACKEND, format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SdrError::storage(BACKEND, format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SdrError::storage(BACKEND, format!("HTTP {}: {}", status, body)));
        }
        Ok(body)
    }
}

fn key_filter(key: &AccountKey) -> (&'static str, String) {
    match key {
        AccountKey::Id(id) => ("account_id", format!("eq.{}", id)),
        AccountKey::Name(name) => ("account_name", format!("eq.{}", name)),
    }
}

#[async_trait]
impl StorageBackend for SupabaseBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    #[instrument(skip(self))]
    async fn list_accounts(&self) -> SdrResult<Vec<Account>> {
        let body = self
            .execute(self.request(Method::GET, "accounts").query(&[("select", "*")]))
            .await?;

        let rows: Vec<AccountRow> = serde_json::from_str(&body)
            .map_err(|e| SdrError::parse(format!("Failed to parse accounts: {}", e)))?;
        debug!("Fetched {} account rows", rows.len());

        Ok(rows.into_iter().map(Account::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_research(&self, key: &AccountKey) -> SdrResult<Option<ResearchRecord>> {
        let (column, filter) = key_filter(key);
        let request = self.request(Method::GET, "research").query(&[
            ("select", "*"),
            (column, filter.as_str()),
            ("limit", "1"),
        ]);
        let body = self.execute(request).await?;

        let rows: Vec<ResearchRecord> = serde_json::from_str(&body)
            .map_err(|e| SdrError::parse(format!("Failed to parse research rows: {}", e)))?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, record), fields(account = %record.account_name))]
    async fn insert_research(&self, record: &ResearchRecord) -> SdrResult<()> {
        let request = self
            .request(Method::POST, "research")
            .header("Prefer", "return=representation")
            .json(record);
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(account = %record.account_name))]
    async fn update_research(&self, record_id: &str, record: &ResearchRecord) -> SdrResult<()> {
        let filter = format!("eq.{}", record_id);
        let request = self
            .request(Method::PATCH, "research")
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(record);
        self.execute(request).await?;
        Ok(())
    }
}
