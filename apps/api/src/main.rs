mod assist;
mod ats;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::extract::DefaultBodyLimit;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::contact::TextPatterns;
use crate::ats::keywords::SkillMatcher;
use crate::ats::scorer::{AtsScorer, KeywordAtsScorer, LlmAtsScorer, ScoreWeights};
use crate::config::{Config, S3Config, ScorerBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resume::parser::{ResumeParser, MAX_UPLOAD_BYTES};
use crate::routes::build_router;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 64 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumely API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let redis = redis::Client::open(config.redis_url.clone()).context("invalid REDIS_URL")?;
    info!("Redis client initialized");

    let s3 = match &config.s3 {
        Some(s3_config) => {
            let client = build_s3_client(s3_config).await;
            info!("S3 upload archive enabled (bucket: {})", s3_config.bucket);
            Some(client)
        }
        None => {
            info!("S3 not configured, upload archive disabled");
            None
        }
    };

    let llm = match &config.llm_api_key {
        Some(key) => {
            let client = LlmClient::new(
                key.clone(),
                config.llm_base_url.clone(),
                config.llm_model.clone(),
            )
            .context("failed to build LLM client")?;
            info!("LLM client initialized (model: {})", client.model());
            Some(client)
        }
        None => {
            warn!("LLM_API_KEY not set, AI-assist endpoints will return 503");
            None
        }
    };

    let patterns = TextPatterns::new().context("failed to compile text patterns")?;
    let skills = SkillMatcher::new().context("failed to build skill matcher")?;
    let keyword_scorer = KeywordAtsScorer::new(ScoreWeights::default(), patterns.clone(), skills)
        .map_err(|e| anyhow!("invalid ATS score weights: {e}"))?;

    let ats_scorer: Arc<dyn AtsScorer> = match (config.ats_scorer, &llm) {
        (ScorerBackend::Llm, Some(client)) => {
            info!("ATS scorer: llm (blended with keyword)");
            Arc::new(LlmAtsScorer::new(keyword_scorer, client.clone()))
        }
        (ScorerBackend::Llm, None) => {
            warn!("ATS_SCORER=llm but LLM_API_KEY is not set, falling back to keyword");
            Arc::new(keyword_scorer)
        }
        (ScorerBackend::Keyword, _) => {
            info!("ATS scorer: keyword");
            Arc::new(keyword_scorer)
        }
    };

    let parser = ResumeParser::new(patterns).context("failed to compile resume parser")?;

    let state = AppState {
        db,
        redis,
        s3,
        llm,
        config: config.clone(),
        ats_scorer,
        parser: Arc::new(parser),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (local) or AWS (production).
async fn build_s3_client(s3: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &s3.access_key_id,
        &s3.secret_access_key,
        None,
        None,
        "resumely-static",
    );

    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&s3.endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(true)
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
