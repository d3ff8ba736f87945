//! Research records and the request/response shapes around them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{opaque_id_field, opaque_id_opt, AccountKey};

/// A persisted research artifact for one account
///
/// Field names match the `research` table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    #[serde(default, deserialize_with = "opaque_id_opt", skip_serializing)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub industry_insights: String,
    #[serde(default)]
    pub company_insights: String,
    #[serde(default)]
    pub vision_insights: String,
    #[serde(default)]
    pub talk_track: String,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResearchRecord {
    /// Key used to find an existing record for the same account
    pub fn account_key(&self) -> AccountKey {
        AccountKey::from_parts(&self.account_id, &self.account_name)
    }
}

/// Output of a research generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    pub success: bool,
    pub industry_insights: String,
    pub company_insights: String,
    pub vision_insights: String,
    pub recommended_talk_track: String,
}

/// Body of a save-research request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResearchRequest {
    #[serde(default, deserialize_with = "opaque_id_field")]
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub industry_insights: Option<String>,
    pub company_insights: Option<String>,
    pub vision_insights: Option<String>,
    pub recommended_talk_track: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

impl SaveResearchRequest {
    /// Name of the first required field that is absent, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("accountId", &self.account_id),
            ("accountName", &self.account_name),
            ("industryInsights", &self.industry_insights),
            ("companyInsights", &self.company_insights),
            ("visionInsights", &self.vision_insights),
            ("recommendedTalkTrack", &self.recommended_talk_track),
        ]
        .into_iter()
        .find(|(_, value)| value.is_none())
        .map(|(name, _)| name)
    }

    /// Convert into a record stamped with the current time
    pub fn into_record(self, created_by: Option<String>) -> ResearchRecord {
        let now = Utc::now();
        ResearchRecord {
            id: None,
            account_id: self.account_id.unwrap_or_default(),
            account_name: self.account_name.unwrap_or_default(),
            industry_insights: self.industry_insights.unwrap_or_default(),
            company_insights: self.company_insights.unwrap_or_default(),
            vision_insights: self.vision_insights.unwrap_or_default(),
            talk_track: self.recommended_talk_track.unwrap_or_default(),
            created_by: created_by.or(self.created_by),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of a persistence attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub success: bool,
    pub message: String,
}

impl SaveOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
