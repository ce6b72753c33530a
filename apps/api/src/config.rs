use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback OpenRouter API key, used when the stored settings carry none.
    pub openrouter_api_key: Option<String>,
    /// Path of the JSON file backing the key-value store.
    pub storage_path: String,
    /// Optional external prompt-template document; embedded templates are
    /// used when unset.
    pub prompts_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            storage_path: std::env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "data/store.json".to_string()),
            prompts_path: std::env::var("PROMPTS_PATH").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
