//! Knowledge library entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved insight in the knowledge library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub date_added: DateTime<Utc>,
    pub user_id: Option<String>,
}

/// Body of an add-entry request; every field is checked before insertion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLibraryEntry {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub user_id: Option<String>,
}
