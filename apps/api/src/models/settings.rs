//! User settings with layered merge semantics: a partial update is
//! shallow-merged onto the stored settings, which are themselves merged onto
//! hard-coded defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::DEFAULT_MODEL;

pub const DEFAULT_MIN_FIT_SCORE: f64 = 0.15;
pub const DEFAULT_MAX_AGGRESSIVENESS: f64 = 0.95;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Per-user provider API key. Empty string means "not set".
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub aggressive_fit: AggressiveFitPolicy,
}

/// Policy governing how aggressively resumes are rewritten and when a
/// vacancy is skipped as too poor a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggressiveFitPolicy {
    pub enabled: bool,
    pub min_fit_score: f64,
    pub max_aggressiveness: f64,
    /// When set, this level is used verbatim (clamped to [0,1]) instead of
    /// the fit-derived one. It never affects the skip decision.
    #[serde(default)]
    pub aggressiveness_override: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            aggressive_fit: AggressiveFitPolicy::default(),
        }
    }
}

impl Default for AggressiveFitPolicy {
    fn default() -> Self {
        AggressiveFitPolicy {
            enabled: true,
            min_fit_score: DEFAULT_MIN_FIT_SCORE,
            max_aggressiveness: DEFAULT_MAX_AGGRESSIVENESS,
            aggressiveness_override: None,
        }
    }
}

/// Resolves effective settings: defaults ← stored ← patch, each layer
/// shallow-merged (top-level keys replace wholesale).
pub fn resolve_settings(stored: Option<Value>, patch: Option<Value>) -> Settings {
    let mut value = serde_json::to_value(Settings::default())
        .expect("Settings default must serialize");

    for layer in [stored, patch].into_iter().flatten() {
        shallow_merge(&mut value, layer);
    }

    // A layer with an unknown or ill-typed key falls back to defaults rather
    // than failing the whole read.
    serde_json::from_value(value).unwrap_or_default()
}

fn shallow_merge(base: &mut Value, overlay: Value) {
    if let (Value::Object(base_map), Value::Object(overlay_map)) = (base, overlay) {
        for (key, value) in overlay_map {
            base_map.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert!(settings.aggressive_fit.enabled);
        assert!((settings.aggressive_fit.min_fit_score - 0.15).abs() < f64::EPSILON);
        assert!((settings.aggressive_fit.max_aggressiveness - 0.95).abs() < f64::EPSILON);
        assert!(settings.aggressive_fit.aggressiveness_override.is_none());
    }

    #[test]
    fn test_resolve_with_no_layers_is_default() {
        let settings = resolve_settings(None, None);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_stored_layer_overrides_defaults() {
        let stored = json!({"apiKey": "sk-or-123", "model": "anthropic/claude-3.5-sonnet"});
        let settings = resolve_settings(Some(stored), None);
        assert_eq!(settings.api_key, "sk-or-123");
        assert_eq!(settings.model, "anthropic/claude-3.5-sonnet");
        // Untouched keys keep their defaults.
        assert!(settings.aggressive_fit.enabled);
    }

    #[test]
    fn test_patch_layer_wins_over_stored() {
        let stored = json!({"model": "a"});
        let patch = json!({"model": "b"});
        let settings = resolve_settings(Some(stored), Some(patch));
        assert_eq!(settings.model, "b");
    }

    #[test]
    fn test_merge_is_shallow_nested_object_replaces_wholesale() {
        let patch = json!({
            "aggressiveFit": {
                "enabled": false,
                "minFitScore": 0.3,
                "maxAggressiveness": 0.8
            }
        });
        let settings = resolve_settings(None, Some(patch));
        assert!(!settings.aggressive_fit.enabled);
        assert!((settings.aggressive_fit.min_fit_score - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ill_typed_layer_falls_back_to_defaults() {
        let stored = json!({"aggressiveFit": "not an object"});
        let settings = resolve_settings(Some(stored), None);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }
}
