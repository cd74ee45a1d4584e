use anyhow::{bail, Context, Result};

/// Default draft lifetime: 7 days.
const DEFAULT_DRAFT_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

/// Which ATS scorer backend `AppState` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerBackend {
    Keyword,
    Llm,
}

/// S3-compatible storage for archiving uploaded resume files.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// `None` disables upload archiving.
    pub s3: Option<S3Config>,
    /// `None` disables the AI-assist endpoints.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub ats_scorer: ScorerBackend,
    pub draft_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3: s3_from_env()?,
            llm_api_key: optional_env("LLM_API_KEY"),
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            ats_scorer: parse_scorer_backend(optional_env("ATS_SCORER").as_deref())?,
            draft_ttl_secs: parse_draft_ttl(optional_env("DRAFT_TTL_SECS").as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// The S3 variables are all-or-nothing: a partial set is a startup error.
fn s3_from_env() -> Result<Option<S3Config>> {
    let bucket = optional_env("S3_BUCKET");
    let Some(bucket) = bucket else {
        return Ok(None);
    };

    Ok(Some(S3Config {
        bucket,
        endpoint: require_env("S3_ENDPOINT")?,
        access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
        secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
    }))
}

fn parse_scorer_backend(value: Option<&str>) -> Result<ScorerBackend> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("keyword") => Ok(ScorerBackend::Keyword),
        Some("llm") => Ok(ScorerBackend::Llm),
        Some(other) => bail!("ATS_SCORER must be 'keyword' or 'llm', got '{other}'"),
    }
}

/// Redis rejects `SET EX 0`, so a zero TTL would fail every draft save.
fn parse_draft_ttl(value: Option<&str>) -> Result<u64> {
    let Some(value) = value else {
        return Ok(DEFAULT_DRAFT_TTL_SECS);
    };
    let secs = value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("DRAFT_TTL_SECS must be a positive integer, got '{value}'"))?;
    if secs == 0 {
        bail!("DRAFT_TTL_SECS must be a positive integer, got '0'");
    }
    Ok(secs)
}
