use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::extraction::sanitizer::SanitizePolicy;

/// Deployment settings loaded once from the environment (and `.env` if present).
/// Each binary builds one of these in `main` and hands the pieces it needs to
/// the components it constructs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only the `extract` binary needs a key; the server runs without one.
    pub anthropic_api_key: Option<String>,
    pub pdf_path: PathBuf,
    pub json_output_path: PathBuf,
    /// Database channel is disabled when unset.
    pub database_url: Option<String>,
    pub sanitize_policy: SanitizePolicy,
    pub llm_max_attempts: u32,
    pub public_base_url: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` is the only
    /// production caller; tests feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sanitize_policy = match get("SANITIZE_POLICY") {
            None => SanitizePolicy::default(),
            Some(raw) => raw
                .parse::<SanitizePolicy>()
                .map_err(|e| anyhow!("SANITIZE_POLICY: {e}"))?,
        };

        let llm_max_attempts = get("LLM_MAX_ATTEMPTS")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("LLM_MAX_ATTEMPTS must be a positive integer")?;
        if llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            pdf_path: get("PDF_PATH")
                .unwrap_or_else(|| "resume.pdf".to_string())
                .into(),
            json_output_path: get("JSON_OUTPUT_PATH")
                .unwrap_or_else(|| "raw_api_response.json".to_string())
                .into(),
            database_url: get("DATABASE_URL"),
            sanitize_policy,
            llm_max_attempts,
            public_base_url: get("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:5000".to_string())
                .trim_end_matches('/')
                .to_string(),
            port: get("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }

    /// The API key, or an error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}
