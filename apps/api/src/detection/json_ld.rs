//! JSON-LD structured-data detection. Sites embed schema.org `JobPosting`
//! objects for SEO; finding one is a high-confidence signal and yields typed
//! job fields for free.

use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;

use crate::models::vacancy::strip_html;

/// Job fields extracted from a `JobPosting` block.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub posted_at: Option<String>,
}

/// Scans every JSON-LD script block for a `JobPosting` object — directly,
/// inside an array, or under a `@graph` container. Malformed blocks are
/// skipped silently; multiple script blocks are normal. First match wins.
pub fn find_job_posting(document: &Html) -> Option<ExtractedJobFields> {
    let selector =
        Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");

    for script in document.select(&selector) {
        let raw: String = script.text().collect();
        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        if let Some(posting) = find_posting_value(&value) {
            return Some(extract_fields(posting));
        }
    }
    None
}

fn find_posting_value(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => {
            if is_job_posting(value) {
                return Some(value);
            }
            if let Some(graph) = map.get("@graph").and_then(Value::as_array) {
                return graph.iter().find(|v| is_job_posting(v));
            }
            None
        }
        Value::Array(items) => items.iter().find_map(find_posting_value),
        _ => None,
    }
}

fn is_job_posting(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s == "JobPosting",
        Some(Value::Array(types)) => types.iter().any(|t| t == "JobPosting"),
        _ => false,
    }
}

fn extract_fields(posting: &Value) -> ExtractedJobFields {
    ExtractedJobFields {
        title: string_field(posting, "title"),
        company: posting
            .get("hiringOrganization")
            .and_then(|org| match org {
                Value::String(s) => Some(s.clone()),
                other => string_field(other, "name"),
            }),
        description: string_field(posting, "description").map(|d| strip_html(&d)),
        skills: skills_field(posting.get("skills")),
        salary: posting.get("baseSalary").and_then(format_salary),
        location: posting
            .get("jobLocation")
            .map(first_of_array)
            .and_then(|loc| loc.get("address"))
            .map(first_of_array)
            .and_then(|addr| match addr {
                Value::String(s) => Some(s.clone()),
                other => string_field(other, "addressLocality"),
            }),
        posted_at: string_field(posting, "datePosted"),
    }
}

/// Some sites wrap single values in one-element arrays.
fn first_of_array(value: &Value) -> &Value {
    match value {
        Value::Array(items) if !items.is_empty() => &items[0],
        other => other,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn skills_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

/// Formats a schema.org MonetaryAmount into "100000–150000 RUB" style text.
fn format_salary(base_salary: &Value) -> Option<String> {
    let currency = base_salary
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or("");
    let value = base_salary.get("value")?;

    let range = match (
        value.get("minValue").and_then(Value::as_f64),
        value.get("maxValue").and_then(Value::as_f64),
    ) {
        (Some(min), Some(max)) => format!("{min}–{max}"),
        (Some(min), None) => format!("from {min}"),
        (None, Some(max)) => format!("up to {max}"),
        (None, None) => value
            .get("value")
            .and_then(Value::as_f64)
            .or_else(|| value.as_f64())?
            .to_string(),
    };

    if currency.is_empty() {
        Some(range)
    } else {
        Some(format!("{range} {currency}"))
    }
}
