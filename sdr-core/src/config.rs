//! Environment configuration
//!
//! Every setting is optional. A missing or placeholder credential disables the
//! matching integration instead of failing startup; callers consult the
//! `is_*_configured` predicates to pick their fallback path.

use std::env;

/// Values shipped in sample `.env` files that must never be sent upstream
const PLACEHOLDER_VALUES: &[&str] = &[
    "your_perplexity_api_key_here",
    "your_openai_api_key_here",
    "your_supabase_key_here",
    "your_airtable_api_key_here",
    "placeholder_key",
    "sk-...",
];

pub const DEFAULT_PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";
pub const DEFAULT_PERPLEXITY_MODEL: &str = "sonar";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_AIRTABLE_API_BASE: &str = "https://api.airtable.com/v0";
pub const DEFAULT_AIRTABLE_TABLE: &str = "Companies";
pub const DEFAULT_AIRTABLE_RESEARCH_TABLE: &str = "Research";
pub const DEFAULT_PORT: u16 = 5001;

/// Credentials and model selection for a chat-completion provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Supabase (PostgREST) connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

/// Airtable connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirtableConfig {
    pub api_key: String,
    pub api_base: String,
    pub base_id: String,
    pub accounts_table: String,
    pub research_table: String,
}

/// Application configuration resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub perplexity: ProviderConfig,
    pub openai: ProviderConfig,
    pub supabase: Option<SupabaseConfig>,
    pub airtable: Option<AirtableConfig>,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from process environment variables
    ///
    /// Reads:
    /// - PERPLEXITY_API_KEY, PERPLEXITY_MODEL, PERPLEXITY_API_BASE
    /// - OPENAI_API_KEY, OPENAI_MODEL, OPENAI_API_BASE
    /// - SUPABASE_URL, SUPABASE_KEY
    /// - AIRTABLE_API_KEY, AIRTABLE_BASE_ID, AIRTABLE_TABLE_NAME, AIRTABLE_RESEARCH_TABLE,
    ///   AIRTABLE_API_BASE
    /// - PORT (or SERVER_PORT)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = |key: &str| lookup(key).and_then(sanitize);
        let setting = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let perplexity = ProviderConfig {
            api_key: secret("PERPLEXITY_API_KEY"),
            api_base: setting("PERPLEXITY_API_BASE", DEFAULT_PERPLEXITY_API_BASE),
            model: setting("PERPLEXITY_MODEL", DEFAULT_PERPLEXITY_MODEL),
        };

        let openai = ProviderConfig {
            api_key: secret("OPENAI_API_KEY"),
            api_base: setting("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            model: setting("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        };

        let supabase = match (secret("SUPABASE_URL"), secret("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                key,
            }),
            _ => None,
        };

        let airtable = match (secret("AIRTABLE_API_KEY"), secret("AIRTABLE_BASE_ID")) {
            (Some(api_key), Some(base_id)) => Some(AirtableConfig {
                api_key,
                api_base: setting("AIRTABLE_API_BASE", DEFAULT_AIRTABLE_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                base_id,
                accounts_table: setting("AIRTABLE_TABLE_NAME", DEFAULT_AIRTABLE_TABLE),
                research_table: setting("AIRTABLE_RESEARCH_TABLE", DEFAULT_AIRTABLE_RESEARCH_TABLE),
            }),
            _ => None,
        };

        let port = lookup("PORT")
            .or_else(|| lookup("SERVER_PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            perplexity,
            openai,
            supabase,
            airtable,
            port,
        }
    }

    pub fn is_perplexity_configured(&self) -> bool {
        self.perplexity.is_configured()
    }

    pub fn is_openai_configured(&self) -> bool {
        self.openai.is_configured()
    }

    pub fn is_supabase_configured(&self) -> bool {
        self.supabase.is_some()
    }

    pub fn is_airtable_configured(&self) -> bool {
        self.airtable.is_some()
    }
}

/// Trim a credential and drop it if empty or a known placeholder
fn sanitize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || PLACEHOLDER_VALUES.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert!(!config.is_perplexity_configured());
        assert!(!config.is_openai_configured());
        assert!(!config.is_supabase_configured());
        assert!(!config.is_airtable_configured());
        assert_eq!(config.perplexity.model, "sonar");
        assert_eq!(config.openai.api_base, "https://api.openai.com/v1");
        assert_eq!(config.port, 5001);
    }

    #[test]
    fn test_placeholder_keys_are_ignored() {
        let config = config_from(&[
            ("PERPLEXITY_API_KEY", "your_perplexity_api_key_here"),
            ("OPENAI_API_KEY", "sk-..."),
            ("SUPABASE_URL", "https://db.example.supabase.co"),
            ("SUPABASE_KEY", "   "),
        ]);
        assert!(!config.is_perplexity_configured());
        assert!(!config.is_openai_configured());
        assert!(!config.is_supabase_configured());
    }

    #[test]
    fn test_supabase_requires_url_and_key() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://db.example.supabase.co/"),
            ("SUPABASE_KEY", "service-key"),
        ]);
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.url, "https://db.example.supabase.co");
        assert_eq!(supabase.key, "service-key");
    }

    #[test]
    fn test_airtable_table_defaults() {
        let config = config_from(&[
            ("AIRTABLE_API_KEY", "pat123"),
            ("AIRTABLE_BASE_ID", "app456"),
        ]);
        let airtable = config.airtable.unwrap();
        assert_eq!(airtable.accounts_table, "Companies");
        assert_eq!(airtable.research_table, "Research");
        assert_eq!(airtable.api_base, "https://api.airtable.com/v0");
    }

    #[test]
    fn test_port_alias_and_invalid_value() {
        assert_eq!(config_from(&[("SERVER_PORT", "8080")]).port, 8080);
        assert_eq!(config_from(&[("PORT", "not-a-port")]).port, 5001);
    }
}
