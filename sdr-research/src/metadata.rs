//! Company metadata normalization
//!
//! Model output is *supposed* to be a JSON object but routinely arrives wrapped
//! in prose or code fences, with unquoted keys, bare values, missing commas or
//! a truncated tail. [`normalize_with_stage`] walks a fixed ladder of stages and
//! stops at the first that yields an object:
//!
//! 1. [`ParseStage::Direct`]: strict parse of the whole text
//! 2. [`ParseStage::Embedded`]: strict parse of the first balanced `{...}` span
//! 3. [`ParseStage::Repaired`]: the span (or the text from the first `{`) run
//!    through [`REPAIR_PASSES`], then parsed
//! 4. [`ParseStage::FieldScan`]: per-field regex extraction over the raw text
//! 5. [`ParseStage::Defaults`]: nothing recovered, every field is `"Unknown"`
//!
//! Every repair pass is deterministic and idempotent. This is best-effort:
//! some model outputs (e.g. several bare `key: value` pairs on one line) are
//! only partially recovered.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

pub const UNKNOWN: &str = "Unknown";

/// Fields requested from the metadata prompt, in display order
pub const METADATA_FIELDS: &[&str] = &[
    "headquarters",
    "employees",
    "founded",
    "market_cap",
    "description",
    "financial_performance",
    "performance_trend",
    "product_portfolio",
    "portfolio_header",
    "portfolio_status",
    "industry_trends",
    "industry_header",
    "industry_impact",
];

/// Categorical fields and the only values they may take
pub const CATEGORICAL_FIELDS: &[(&str, &[&str])] = &[
    ("performance_trend", &["positive", "neutral", "negative"]),
    (
        "portfolio_status",
        &["innovation", "growth", "transition", "established"],
    ),
    (
        "industry_impact",
        &["positive", "challenging", "disruptive", "competitive"],
    ),
];

/// Which stage of the ladder produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Direct,
    Embedded,
    Repaired,
    FieldScan,
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMetadata {
    pub fields: BTreeMap<String, String>,
    pub stage: ParseStage,
}

pub type RepairPass = fn(&str) -> String;

/// Repair passes in application order
pub const REPAIR_PASSES: &[(&str, RepairPass)] = &[
    ("normalize_quotes", normalize_quotes),
    ("quote_keys", quote_keys),
    ("quote_bare_values", quote_bare_values),
    ("insert_missing_commas", insert_missing_commas),
    ("close_braces", close_braces),
    ("strip_trailing_commas", strip_trailing_commas),
];

/// Normalize raw model output into exactly `required_fields`
pub fn normalize(raw_text: &str, required_fields: &[&str]) -> BTreeMap<String, String> {
    normalize_with_stage(raw_text, required_fields).fields
}

pub fn normalize_with_stage(raw_text: &str, required_fields: &[&str]) -> NormalizedMetadata {
    let text = raw_text.trim();

    if let Some(object) = parse_object(text) {
        return from_object(&object, required_fields, ParseStage::Direct);
    }

    let span = find_json_object(text);
    if let Some(object) = span.as_deref().and_then(parse_object) {
        return from_object(&object, required_fields, ParseStage::Embedded);
    }

    let candidate = span.or_else(|| {
        text.find('{')
            .map(|start| text[start..].trim_end_matches('`').trim_end().to_string())
    });
    if let Some(candidate) = candidate {
        let repaired = repair(&candidate);
        if let Some(object) = parse_object(&repaired) {
            return from_object(&object, required_fields, ParseStage::Repaired);
        }
    }

    let fields = scan_fields(text, required_fields);
    let stage = if fields.values().any(|v| v != UNKNOWN) {
        ParseStage::FieldScan
    } else {
        ParseStage::Defaults
    };
    NormalizedMetadata { fields, stage }
}

/// Every field set to `"Unknown"`
pub fn default_metadata(required_fields: &[&str]) -> BTreeMap<String, String> {
    required_fields
        .iter()
        .map(|field| (field.to_string(), UNKNOWN.to_string()))
        .collect()
}

/// Force categorical fields into their vocabulary (lowercased) or `"Unknown"`
pub fn apply_vocabularies(fields: &mut BTreeMap<String, String>) {
    for (field, vocabulary) in CATEGORICAL_FIELDS {
        if let Some(value) = fields.get_mut(*field) {
            let candidate = value
                .trim()
                .trim_matches(|c: char| c == '\'' || c == '"' || c == '.')
                .to_lowercase();
            *value = if vocabulary.contains(&candidate.as_str()) {
                candidate
            } else {
                UNKNOWN.to_string()
            };
        }
    }
}

/// Run every repair pass in order
pub fn repair(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    REPAIR_PASSES
        .iter()
        .fold(text, |acc, (_, pass)| pass(&acc))
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn from_object(
    object: &Map<String, Value>,
    required_fields: &[&str],
    stage: ParseStage,
) -> NormalizedMetadata {
    let lookup: BTreeMap<String, &Value> = object
        .iter()
        .map(|(key, value)| (canonical_key(key), value))
        .collect();

    let fields = required_fields
        .iter()
        .map(|field| {
            let value = lookup
                .get(&canonical_key(field))
                .map(|v| value_to_string(v))
                .unwrap_or_else(|| UNKNOWN.to_string());
            (field.to_string(), value)
        })
        .collect();

    NormalizedMetadata { fields, stage }
}

fn canonical_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

fn value_to_string(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .filter(|s| s != UNKNOWN)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    };
    if is_null_like(&text) {
        UNKNOWN.to_string()
    } else {
        text
    }
}

/// Empty, JSON `null`, Python `None` or `N/A`
fn is_null_like(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || ["null", "none", "n/a"]
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker))
}

/// Find the first complete JSON object `{...}` in the text
fn find_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escape {
            escape = false;
            continue;
        }
        if b == b'\\' && in_string {
            escape = true;
            continue;
        }
        if b == b'"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..=i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Apply `f` to every stretch of text outside double-quoted strings
fn map_outside_strings(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut outside = String::new();
    let mut in_string = false;
    let mut escape = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            out.push_str(&f(&outside));
            outside.clear();
            out.push(c);
            in_string = true;
        } else {
            outside.push(c);
        }
    }
    out.push_str(&f(&outside));
    out
}

fn escape_json(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// Repair passes
// ============================================================================

/// Replace typographic quotes and turn single-quoted keys/values into JSON strings
///
/// A single quote only opens a string where a JSON token could start (after
/// `{ [ , :` or at the beginning), so apostrophes in bare text are left alone.
pub fn normalize_quotes(text: &str) -> String {
    let text = text
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");
    let chars: Vec<char> = text.chars().collect();

    let mut out = String::with_capacity(text.len());
    let mut in_double = false;
    let mut escape = false;
    let mut prev_significant: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if in_double {
            out.push(c);
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_double = false;
                prev_significant = Some('"');
            }
            i += 1;
            continue;
        }

        if c == '"' {
            in_double = true;
            out.push(c);
            i += 1;
            continue;
        }

        if c == '\'' && matches!(prev_significant, None | Some('{' | '[' | ',' | ':')) {
            if let Some(end) = closing_single_quote(&chars, i + 1) {
                let inner: String = chars[i + 1..end].iter().collect();
                out.push('"');
                out.push_str(&escape_json(&inner.replace("\\'", "'")));
                out.push('"');
                prev_significant = Some('"');
                i = end + 1;
                continue;
            }
        }

        if !c.is_whitespace() {
            prev_significant = Some(c);
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Index of a single quote that closes a token opened before `from`
fn closing_single_quote(chars: &[char], from: usize) -> Option<usize> {
    let mut j = from;
    while j < chars.len() {
        match chars[j] {
            '\n' => return None,
            '\'' if chars[j - 1] != '\\' => {
                let next = chars[j + 1..].iter().find(|c| **c != ' ' && **c != '\t');
                if matches!(next, None | Some(':' | ',' | '}' | ']' | '\n' | '\r')) {
                    return Some(j);
                }
            }
            _ => {}
        }
        j += 1;
    }
    None
}

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[{,])(\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*):").expect("valid regex")
});

/// Quote identifier keys: `{name: ...}` -> `{"name": ...}`
pub fn quote_keys(text: &str) -> String {
    map_outside_strings(text, |segment| {
        BARE_KEY
            .replace_all(segment, r#"${1}${2}"${3}"${4}:"#)
            .into_owned()
    })
}

static BARE_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^(\s*"[^"\n]+"\s*:\s*)([^\s"{\[][^\n]*?)(\s*,?[ \t]*)$"#)
        .expect("valid regex")
});

/// Quote scalar values that are not valid JSON literals: `"a": Santa Clara` -> `"a": "Santa Clara"`
///
/// Works line by line on `"key": value` lines; numbers, booleans and null are kept.
pub fn quote_bare_values(text: &str) -> String {
    BARE_VALUE
        .replace_all(text, |caps: &Captures| {
            let value = caps[2].trim_end();
            let body = value.trim_end_matches(['}', ']']).trim_end();
            let closing = value[body.len()..].trim_start();
            let body = body.trim_end_matches(',').trim_end();

            if body.is_empty() || is_json_literal(body) {
                return caps[0].to_string();
            }
            format!(
                "{}\"{}\"{}{}",
                &caps[1],
                escape_json(body),
                closing,
                &caps[3]
            )
        })
        .into_owned()
}

fn is_json_literal(text: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(text),
        Ok(Value::Number(_) | Value::Bool(_) | Value::Null)
    )
}

static MISSING_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("|\d|\}|\]|true|false|null)([ \t]*\n\s*)(")"#).expect("valid regex")
});

/// Add the comma between a value and a key on the next line
pub fn insert_missing_commas(text: &str) -> String {
    MISSING_COMMA
        .replace_all(text, "${1},${2}${3}")
        .into_owned()
}

/// Terminate an unterminated string and close unbalanced brackets
pub fn close_braces(text: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for c in text.chars() {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    if !in_string && stack.is_empty() {
        return text.to_string();
    }

    let mut out = text.trim_end().to_string();
    if in_string {
        out.push('"');
    }
    out.extend(stack.iter().rev());
    out
}

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("valid regex"));

/// Drop commas directly before a closing bracket
pub fn strip_trailing_commas(text: &str) -> String {
    map_outside_strings(text, |segment| {
        TRAILING_COMMA.replace_all(segment, "${1}").into_owned()
    })
}

// ============================================================================
// Field scan
// ============================================================================

static NEXT_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#",\s*["']?[A-Za-z_][A-Za-z0-9_ ]*["']?\s*:"#).expect("valid regex")
});

/// Last resort: look for `field: value` anywhere in the text
fn scan_fields(text: &str, required_fields: &[&str]) -> BTreeMap<String, String> {
    required_fields
        .iter()
        .map(|field| {
            let value = scan_field(text, field).unwrap_or_else(|| UNKNOWN.to_string());
            (field.to_string(), value)
        })
        .collect()
}

fn scan_field(text: &str, field: &str) -> Option<String> {
    let name = regex::escape(field).replace('_', "[_ ]");
    let pattern = format!(
        r#"(?i)["'*]?\b{}\b["'*]*\s*[:=]\s*(?:"((?:[^"\\]|\\.)*)"|'([^'\n]*)'|([^\n}}]+))"#,
        name
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;

    let value = if let Some(quoted) = caps.get(1) {
        serde_json::from_str::<String>(&format!("\"{}\"", quoted.as_str()))
            .unwrap_or_else(|_| quoted.as_str().to_string())
    } else if let Some(single) = caps.get(2) {
        single.as_str().to_string()
    } else {
        let bare = caps.get(3)?.as_str();
        let end = NEXT_KEY.find(bare).map(|m| m.start()).unwrap_or(bare.len());
        bare[..end].to_string()
    };

    let value = value.trim().trim_end_matches(',').trim();
    if is_null_like(value) {
        None
    } else {
        Some(value.to_string())
    }
}
