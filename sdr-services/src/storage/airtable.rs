//! Airtable storage backend (legacy)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use sdr_core::{Account, AccountKey, AirtableConfig, ResearchRecord, SdrError, SdrResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use super::{employee_count, text_value, StorageBackend};

const BACKEND: &str = "airtable";

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(default, rename = "createdTime")]
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl AirtableRecord {
    fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(text_value)
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.text(field)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn into_account(self) -> Account {
        Account {
            industry: self.text("Industry"),
            location: self.text("HQ Location"),
            employees: self.fields.get("Employee Count").and_then(employee_count),
            revenue: self.text("Revenue"),
            website: self.text("Website"),
            description: self.text("Description"),
            ..Account::new(self.id.clone(), self.text("Name").unwrap_or_default())
        }
    }

    fn into_research(self) -> ResearchRecord {
        let created_at = self
            .timestamp("Created At")
            .or(self.created_time)
            .unwrap_or_else(Utc::now);
        ResearchRecord {
            id: Some(self.id.clone()),
            account_id: self.text("Account ID").unwrap_or_default(),
            account_name: self.text("Account Name").unwrap_or_default(),
            industry_insights: self.text("Industry Insights").unwrap_or_default(),
            company_insights: self.text("Company Insights").unwrap_or_default(),
            vision_insights: self.text("Vision Insights").unwrap_or_default(),
            talk_track: self.text("Recommended Talk Track").unwrap_or_default(),
            created_by: self.text("Created By"),
            created_at,
            updated_at: self.timestamp("Updated At").unwrap_or(created_at),
        }
    }
}

/// Cell values written for a research record
///
/// `Created At` is only sent on insert; `Created By` whenever it is set.
fn research_fields(record: &ResearchRecord, include_created: bool) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("Account ID".into(), json!(record.account_id));
    fields.insert("Account Name".into(), json!(record.account_name));
    fields.insert("Industry Insights".into(), json!(record.industry_insights));
    fields.insert("Company Insights".into(), json!(record.company_insights));
    fields.insert("Vision Insights".into(), json!(record.vision_insights));
    fields.insert("Recommended Talk Track".into(), json!(record.talk_track));
    fields.insert("Updated At".into(), json!(record.updated_at.to_rfc3339()));
    if include_created {
        fields.insert("Created At".into(), json!(record.created_at.to_rfc3339()));
    }
    if let Some(created_by) = &record.created_by {
        fields.insert("Created By".into(), json!(created_by));
    }
    fields
}

/// `filterByFormula` expression matching the account key
fn key_formula(key: &AccountKey) -> String {
    let (field, value) = match key {
        AccountKey::Id(id) => ("Account ID", id),
        AccountKey::Name(name) => ("Account Name", name),
    };
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("{{{}}}='{}'", field, escaped)
}

pub struct AirtableBackend {
    client: Client,
    api_key: String,
    base_url: String,
    accounts_table: String,
    research_table: String,
}

impl AirtableBackend {
    pub fn new(config: &AirtableConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: format!("{}/{}", config.api_base, config.base_id),
            accounts_table: config.accounts_table.clone(),
            research_table: config.research_table.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

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

    /// Fetch every record of a table, following `offset` pagination
    async fn list_records(
        &self,
        table: &str,
        formula: Option<&str>,
    ) -> SdrResult<Vec<AirtableRecord>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = Vec::new();
            if let Some(formula) = formula {
                query.push(("filterByFormula", formula));
            }
            if let Some(offset) = offset.as_deref() {
                query.push(("offset", offset));
            }

            let body = self
                .execute(self.request(Method::GET, table).query(&query))
                .await?;
            let page: RecordPage = serde_json::from_str(&body)
                .map_err(|e| SdrError::parse(format!("Failed to parse Airtable page: {}", e)))?;

            records.extend(page.records);
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!("Fetched {} records from {}", records.len(), table);
        Ok(records)
    }
}

#[async_trait]
impl StorageBackend for AirtableBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    #[instrument(skip(self))]
    async fn list_accounts(&self) -> SdrResult<Vec<Account>> {
        let records = self.list_records(&self.accounts_table, None).await?;
        Ok(records.into_iter().map(AirtableRecord::into_account).collect())
    }

    #[instrument(skip(self))]
    async fn find_research(&self, key: &AccountKey) -> SdrResult<Option<ResearchRecord>> {
        let formula = key_formula(key);
        let records = self
            .list_records(&self.research_table, Some(&formula))
            .await?;
        Ok(records.into_iter().next().map(AirtableRecord::into_research))
    }

    #[instrument(skip(self, record), fields(account = %record.account_name))]
    async fn insert_research(&self, record: &ResearchRecord) -> SdrResult<()> {
        let body = json!({ "fields": research_fields(record, true) });
        let request = self.request(Method::POST, &self.research_table).json(&body);
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(account = %record.account_name))]
    async fn update_research(&self, record_id: &str, record: &ResearchRecord) -> SdrResult<()> {
        let body = json!({ "fields": research_fields(record, false) });
        let path = format!("{}/{}", self.research_table, record_id);
        let request = self.request(Method::PATCH, &path).json(&body);
        self.execute(request).await?;
        Ok(())
    }
}
