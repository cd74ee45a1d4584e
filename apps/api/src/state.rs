use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::ats::scorer::AtsScorer;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resume::parser::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Draft autosave store.
    pub redis: RedisClient,
    /// Upload archive. `None` when S3 is not configured.
    pub s3: Option<S3Client>,
    /// `None` when no LLM key is configured; AI-assist endpoints answer 503.
    pub llm: Option<LlmClient>,
    pub config: Config,
    /// Pluggable ATS scorer. Default: KeywordAtsScorer. Swap via ATS_SCORER.
    pub ats_scorer: Arc<dyn AtsScorer>,
    pub parser: Arc<ResumeParser>,
}

impl AppState {
    pub fn llm(&self) -> Result<&LlmClient, AppError> {
        self.llm.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable(
                "AI assistance is disabled: LLM_API_KEY is not configured".to_string(),
            )
        })
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.config.s3.as_ref().map(|s3| s3.bucket.as_str())
    }
}
