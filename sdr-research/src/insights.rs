//! Insight sections produced for an account

use serde::{Deserialize, Serialize};

pub const INDUSTRY_HEADER: &str = "## Industry Insights";
pub const COMPANY_HEADER: &str = "## Company Information";
pub const VISION_HEADER: &str = "## Forward-Thinking Vision";

/// The three insight sections for one company
///
/// All three empty is the provider failure sentinel; see [`Insights::empty`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub industry: String,
    pub company: String,
    pub vision: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Industry,
    Company,
    Vision,
}

impl Section {
    fn header(self) -> &'static str {
        match self {
            Section::Industry => INDUSTRY_HEADER,
            Section::Company => COMPANY_HEADER,
            Section::Vision => VISION_HEADER,
        }
    }

    /// Map a heading title onto a section by its leading words
    fn from_title(title: &str) -> Option<Self> {
        if title.starts_with("industry") {
            Some(Section::Industry)
        } else if title.starts_with("company") {
            Some(Section::Company)
        } else if title.starts_with("forward") || title.contains("vision") {
            Some(Section::Vision)
        } else {
            None
        }
    }

    /// True when the title is one of the three headers the prompt asks for
    fn is_canonical(title: &str) -> bool {
        let letters: String = title.chars().filter(char::is_ascii_alphanumeric).collect();
        matches!(
            letters.as_str(),
            "industryinsights" | "companyinformation" | "forwardthinkingvision"
        )
    }
}

/// A heading line: `#`-prefixed (with its level) or fully bold (no level)
struct Heading {
    level: Option<usize>,
    title: String,
}

impl Heading {
    fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        let level = if trimmed.starts_with('#') {
            Some(trimmed.chars().take_while(|&c| c == '#').count())
        } else if trimmed.starts_with("**") && trimmed.trim_end_matches(':').ends_with("**") {
            None
        } else {
            return None;
        };

        let title = trimmed
            .trim_matches(|c: char| c == '#' || c == '*' || c == ':' || c.is_whitespace())
            .to_lowercase();
        Some(Self { level, title })
    }
}

impl Insights {
    /// Failure sentinel: every section empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// True only for the failure sentinel
    pub fn is_empty(&self) -> bool {
        self.industry.trim().is_empty()
            && self.company.trim().is_empty()
            && self.vision.trim().is_empty()
    }

    /// Split provider output into the three sections
    ///
    /// Each section is returned under its canonical header. Only headings at
    /// the level of the first section heading (or the exact canonical titles)
    /// open a section; deeper headings stay in the current body. A section the
    /// model skipped reuses the whole response as its body; a response with
    /// no recognizable heading at all is treated as a single overview.
    pub fn from_content(content: &str) -> Self {
        let content = content.trim();
        if content.is_empty() {
            return Self::empty();
        }

        let mut bodies: [Option<Vec<&str>>; 3] = [None, None, None];
        let mut current: Option<Section> = None;
        // Level of the `#` headings that open sections; deeper ones are body text
        let mut section_level: Option<usize> = None;

        for line in content.lines() {
            if let Some(heading) = Heading::parse(line) {
                let section = Section::from_title(&heading.title).filter(|_| {
                    let top_level = match (heading.level, section_level) {
                        (_, None) => true,
                        (Some(level), Some(top)) => level <= top,
                        (None, Some(_)) => false,
                    };
                    top_level || Section::is_canonical(&heading.title)
                });
                if let Some(section) = section {
                    if let Some(level) = heading.level {
                        section_level = Some(section_level.map_or(level, |top| top.min(level)));
                    }
                    current = Some(section);
                    bodies[section as usize].get_or_insert_with(Vec::new);
                    continue;
                }
            }
            if let Some(section) = current {
                if let Some(body) = bodies[section as usize].as_mut() {
                    body.push(line);
                }
            }
        }

        let render = |section: Section| {
            let body = bodies[section as usize]
                .as_ref()
                .map(|lines| lines.join("\n").trim().to_string())
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| content.to_string());
            format!("{}\n{}", section.header(), body)
        };

        Self {
            industry: render(Section::Industry),
            company: render(Section::Company),
            vision: render(Section::Vision),
        }
    }

    /// Locally templated stand-in used when the provider returns the sentinel
    pub fn placeholder(company_name: &str) -> Self {
        Self {
            industry: format!(
                "{}\nIndustry trends and competitive landscape information for {} would appear here.",
                INDUSTRY_HEADER, company_name
            ),
            company: format!(
                "{}\nCompany background, products, and strategic initiatives for {} would appear here.",
                COMPANY_HEADER, company_name
            ),
            vision: format!(
                "{}\nFuture opportunities and strategic recommendations for {} would appear here.",
                VISION_HEADER, company_name
            ),
        }
    }
}
