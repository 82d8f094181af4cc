use std::env;
use std::str::FromStr;

use tracing::info;

/// Application configuration loaded from environment variables.
/// Created once at process start, read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    // OpenAI
    pub openai_api_key: String,
    pub model_name: String,

    // Temperatures: deterministic summaries, creative posts
    pub summary_temperature: f32,
    pub post_temperature: f32,

    // Token budgets
    pub token_limit_threshold: usize,
    pub summary_token_budget: usize,

    // Chunking
    pub chunk_size: usize,
    pub chunk_overlap: usize,

    // External call timeouts
    pub http_timeout_secs: u64,
    pub llm_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: required_env("OPENAI_API_KEY"),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o".to_string()),
            summary_temperature: parsed_env("SUMMARY_TEMPERATURE", 0.0),
            post_temperature: parsed_env("POST_TEMPERATURE", 0.7),
            token_limit_threshold: parsed_env("TOKEN_LIMIT_THRESHOLD", 25_000),
            summary_token_budget: parsed_env("SUMMARY_TOKEN_BUDGET", 5_000),
            chunk_size: parsed_env("CHUNK_SIZE", 2_000),
            chunk_overlap: parsed_env("CHUNK_OVERLAP", 200),
            http_timeout_secs: parsed_env("HTTP_TIMEOUT_SECS", 30),
            llm_timeout_secs: parsed_env("LLM_TIMEOUT_SECS", 120),
        }
    }

    /// Log the non-secret configuration at startup.
    pub fn log_redacted(&self) {
        info!(
            model = self.model_name.as_str(),
            token_limit_threshold = self.token_limit_threshold,
            summary_token_budget = self.summary_token_budget,
            chunk_size = self.chunk_size,
            chunk_overlap = self.chunk_overlap,
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parsed_env<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid number, got {raw:?}")),
        Err(_) => default,
    }
}
