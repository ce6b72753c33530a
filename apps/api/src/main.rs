mod config;
mod detection;
mod errors;
mod fit;
mod jobsite;
mod language;
mod llm_client;
mod models;
mod personalize;
mod prompts;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::prompts::TemplateStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::JsonFileStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobpilot API v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(JsonFileStore::open(&config.storage_path).await?);
    info!("Key-value store opened at {}", config.storage_path);

    let templates = Arc::new(match &config.prompts_path {
        Some(path) => TemplateStore::from_file(path)?,
        None => TemplateStore::embedded()?,
    });
    info!("Prompt templates loaded");

    let state = AppState {
        http: reqwest::Client::new(),
        store,
        templates,
        config: config.clone(),
        // Submission stays unwired until a job-site client is configured;
        // the apply endpoint reports NotImplemented meanwhile.
        job_site: None,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the browser extension calls from page origins

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
