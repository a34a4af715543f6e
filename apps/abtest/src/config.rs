use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the API key is required; model identifiers have CLI-overridable
/// defaults so the harness can run against any baseline/tuned pair.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub baseline_model: String,
    /// Fine-tuned model id (usually `ft:...`). Absent means baseline-only run.
    pub tuned_model: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let tuned_model = std::env::var("GEN_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty());

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            baseline_model: std::env::var("BASELINE_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            tuned_model,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
