use anyhow::{Context, Result};

const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables once at startup
/// and handed to every component through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ai_gateway_url: String,
    pub ai_api_key: String,
    pub ai_model: String,
    /// Ask the gateway for `response_format: json_object`. Extraction still runs on the reply.
    pub ai_json_mode: bool,
    pub ai_timeout_secs: u64,
    /// Timeout for downloading a document from storage.
    pub document_fetch_timeout_secs: u64,
    /// Downloads larger than this are abandoned before text extraction.
    pub max_document_bytes: usize,
    /// Upper bound on document text interpolated into the parse prompt.
    pub max_document_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ai_gateway_url: optional_env("AI_GATEWAY_URL", DEFAULT_AI_GATEWAY_URL),
            ai_api_key: require_env("AI_GATEWAY_API_KEY")?,
            ai_model: optional_env("AI_MODEL", DEFAULT_AI_MODEL),
            ai_json_mode: parse_env("AI_JSON_MODE", false)?,
            ai_timeout_secs: parse_env("AI_REQUEST_TIMEOUT_SECS", 120)?,
            document_fetch_timeout_secs: parse_env("DOCUMENT_FETCH_TIMEOUT_SECS", 30)?,
            max_document_bytes: parse_env("MAX_DOCUMENT_BYTES", DEFAULT_MAX_DOCUMENT_BYTES)?,
            max_document_chars: parse_env("MAX_DOCUMENT_CHARS", 20_000)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests. Nothing here is dialled.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/coach_test".to_string(),
            ai_gateway_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            ai_api_key: "test-key".to_string(),
            ai_model: DEFAULT_AI_MODEL.to_string(),
            ai_json_mode: false,
            ai_timeout_secs: 5,
            document_fetch_timeout_secs: 5,
            max_document_bytes: 4096,
            max_document_chars: 200,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
