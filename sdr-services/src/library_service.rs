//! In-memory knowledge library of saved insights

use chrono::{DateTime, TimeZone, Utc};
use sdr_core::{LibraryEntry, NewLibraryEntry, SdrError};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub struct LibraryService {
    entries: RwLock<Vec<LibraryEntry>>,
}

impl Default for LibraryService {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryService {
    /// Library seeded with the sample news entries
    pub fn new() -> Self {
        Self::with_entries(sample_entries())
    }

    pub fn with_entries(entries: Vec<LibraryEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// All entries, newest first
    pub async fn list_entries(&self) -> Vec<LibraryEntry> {
        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        entries
    }

    /// Validate and store a new entry
    pub async fn add_entry(&self, new_entry: NewLibraryEntry) -> Result<LibraryEntry, SdrError> {
        let title = required_text(new_entry.title, "title")?;
        let content = required_text(new_entry.content, "content")?;
        let category = required_text(new_entry.category, "category")?;
        let tags = new_entry
            .tags
            .ok_or_else(|| SdrError::validation("tags is required"))?;

        let entry = LibraryEntry {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            category,
            tags,
            date_added: Utc::now(),
            user_id: new_entry.user_id,
        };

        self.entries.write().await.push(entry.clone());
        info!("Added library entry {} ({})", entry.id, entry.title);
        Ok(entry)
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, SdrError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SdrError::validation(format!("{} is required", field)))
}

fn seeded_at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn sample_entry(
    id: &str,
    title: &str,
    content: &str,
    date_added: DateTime<Utc>,
    tags: &[&str],
) -> LibraryEntry {
    LibraryEntry {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        category: "News".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        date_added,
        user_id: Some("1".to_string()),
    }
}

fn sample_entries() -> Vec<LibraryEntry> {
    vec![
        sample_entry(
            "1",
            "Anthropic's Hybrid Reasoning AI Model: Claude 3.7 Sonnet",
            "Anthropic has introduced Claude 3.7 Sonnet, a 'hybrid reasoning model' that excels in solving complex problems, particularly in mathematics and coding. Users can adjust the level of reasoning based on their needs, and the model is available via the Claude app, Anthropic's API, Amazon Bedrock and Google's Vertex AI.",
            seeded_at(3, 17, 9, 30),
            &["AI", "Anthropic", "Claude", "Hybrid Reasoning"],
        ),
        sample_entry(
            "2",
            "Emergence of 'Vibe Coding'",
            "A new trend termed 'vibe coding' is gaining traction in Silicon Valley. The approach leverages AI to write code from simple instructions, minimizing direct coding effort, and industry leaders anticipate significant shifts in software engineering as a result.",
            seeded_at(3, 15, 14, 15),
            &["AI", "Coding", "OpenAI", "Vibe Coding"],
        ),
        sample_entry(
            "3",
            "OpenAI's New Developer Tools Amidst Rising Competition",
            "OpenAI has launched the Responses API to help developers build AI agents that execute complex tasks without direct human intervention. It replaces the Assistants API, which is expected to be phased out by mid-2026, amid increasing competition from other AI agent vendors.",
            seeded_at(3, 14, 11, 45),
            &["AI", "OpenAI", "Developer Tools", "Competition"],
        ),
        sample_entry(
            "4",
            "AI's Growing Role in Software Development",
            "Anthropic's CEO predicts that AI could be writing 90% of software code within 3 to 6 months. Developers will still be needed for design inputs initially, and many startup founders already rely heavily on AI for coding.",
            seeded_at(3, 12, 16, 20),
            &["AI", "Software Development", "Anthropic", "Future of Coding"],
        ),
        sample_entry(
            "5",
            "Market Growth Projections for AI Coding Assistants",
            "The global generative AI coding assistants market was estimated at USD 18.6 million in 2023 and is projected to grow at a CAGR of 25.8% from 2024 to 2030, reaching USD 92.5 million by 2030.",
            seeded_at(3, 10, 10, 0),
            &["AI", "Market Growth", "Coding Assistants", "Industry Forecast"],
        ),
    ]
}
