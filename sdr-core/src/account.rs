//! Account (prospect company) types

use serde::{Deserialize, Deserializer, Serialize};

/// A prospect company
///
/// `name` is the natural lookup key across backends. `id` is assigned by
/// whichever backend produced the record and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employees: Option<u64>,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            industry: None,
            location: None,
            employees: None,
            revenue: None,
            website: None,
            description: None,
        }
    }

    /// Case-insensitive exact name match
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Compact `{id, name}` projection used by account pickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
        }
    }
}

/// Reference to the account a research record belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountKey {
    Id(String),
    Name(String),
}

impl AccountKey {
    /// Prefer the backend id; fall back to the account name when the id is blank
    pub fn from_parts(account_id: &str, account_name: &str) -> Self {
        if account_id.trim().is_empty() {
            AccountKey::Name(account_name.trim().to_string())
        } else {
            AccountKey::Id(account_id.trim().to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            AccountKey::Id(v) | AccountKey::Name(v) => v,
        }
    }
}

/// Backends hand out ids as strings or integers; normalize to a string
pub fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Optional variant of [`opaque_id`]
pub fn opaque_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = opaque_id(deserializer)?;
    Ok(if id.is_empty() { None } else { Some(id) })
}

/// Request-body variant of [`opaque_id`]: only `null` is absent, a blank id is kept
pub fn opaque_id_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
