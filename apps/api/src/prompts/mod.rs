//! Prompt Builder — named templates with `{{dotted.path}}` interpolation.
//!
//! Templates live in an embedded YAML document (overridable from disk) and
//! carry their own sampling parameters, so call sites only supply the model
//! id and the variable context.

use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, ChatParams};

const EMBEDDED_TEMPLATES: &str = include_str!("templates.yaml");

#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    #[serde(default)]
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub struct TemplateStore {
    templates: HashMap<String, PromptTemplate>,
}

impl TemplateStore {
    /// Loads the templates compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_TEMPLATES)
    }

    /// Loads templates from an external YAML document, for deployments that
    /// tune prompts without rebuilding.
    pub fn from_file(path: &str) -> Result<Self> {
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt templates from '{path}'"))?;
        Self::from_yaml(&document)
    }

    pub fn from_yaml(document: &str) -> Result<Self> {
        let templates: HashMap<String, PromptTemplate> =
            serde_yaml::from_str(document).context("Failed to parse prompt templates")?;
        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Result<&PromptTemplate, AppError> {
        self.templates
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("Prompt template '{name}' not found")))
    }

    /// Interpolates a named template and packages it as call parameters.
    pub fn build(&self, name: &str, model: &str, vars: &Value) -> Result<ChatParams, AppError> {
        let template = self.get(name)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &template.system {
            messages.push(ChatMessage::system(interpolate(system, vars)));
        }
        messages.push(ChatMessage::user(interpolate(&template.user, vars)));

        Ok(ChatParams {
            model: model.to_string(),
            temperature: template.temperature,
            max_tokens: template.max_tokens,
            messages,
        })
    }
}

/// Replaces `{{dotted.path}}` placeholders with values from a JSON context.
/// Missing paths interpolate to the empty string; arrays join with ", ".
pub fn interpolate(template: &str, vars: &Value) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    // The placeholder grammar is fixed, so this regex always compiles.
    let placeholder = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)\s*\}\}").expect("valid regex")
    });

    placeholder
        .replace_all(template, |caps: &regex::Captures| {
            render_value(lookup_path(vars, &caps[1]))
        })
        .into_owned()
}

fn lookup_path<'a>(vars: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = vars;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| render_value(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other @ Value::Object(_)) => other.to_string(),
    }
}
