use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::ats::completeness::score_resume;
use crate::ats::handlers::AtsCheckResponse;
use crate::ats::scorer::AtsInput;
use crate::errors::AppError;
use crate::models::resume::{LegacyResumeData, ResumeData, ResumeInput, ResumePayload, ResumeRow};
use crate::resume::drafts::{discard_draft, load_draft, save_draft};
use crate::resume::parser::extract_text;
use crate::resume::store;
use crate::resume::upload::{read_upload_form, try_archive, UploadedFile};
use crate::resume::validation::validate_resume;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CreateResumeRequest {
    #[serde(default, alias = "userId")]
    pub user_id: Option<Uuid>,
    pub resume: ResumeInput,
}

#[derive(Deserialize)]
pub struct UpdateResumeRequest {
    pub resume: ResumeInput,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub resume: ResumeInput,
}

#[derive(Deserialize)]
pub struct ScoreStoredRequest {
    #[serde(default, alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Serialize)]
pub struct ResumeResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub ats_score: Option<i32>,
    pub resume: ResumeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing entry; the document body is left out.
#[derive(Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub ats_score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ParseResponse {
    pub resume: ResumeData,
    pub raw_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub from: &'static str,
    pub to: &'static str,
    pub resume: Value,
}

impl TryFrom<ResumeRow> for ResumeResponse {
    type Error = AppError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        let resume = row.document().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("stored resume {} is corrupt: {e}", row.id))
        })?;
        Ok(ResumeResponse {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            ats_score: row.ats_score,
            resume,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// POST /api/resume/parse
pub async fn handle_parse_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;

    let (raw_text, source_key) =
        extract_then_archive(state.s3.as_ref(), state.s3_bucket(), &file).await?;
    let resume = state.parser.parse(&raw_text);

    Ok(Json(ParseResponse {
        resume,
        raw_text,
        source_key,
    }))
}

/// Only files that yield text are archived.
async fn extract_then_archive(
    s3: Option<&aws_sdk_s3::Client>,
    bucket: Option<&str>,
    file: &UploadedFile,
) -> Result<(String, Option<String>), AppError> {
    let raw_text =
        extract_text(file.bytes.clone(), &file.filename, file.content_type.as_deref()).await?;
    let source_key = try_archive(s3, bucket, file).await;
    Ok((raw_text, source_key))
}

/// POST /api/resume
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeResponse>), AppError> {
    let ResumeInput(resume) = req.resume;
    validate_resume(&resume, state.parser.patterns())?;

    let row = store::create_resume(&state.db, req.user_id, &resume).await?;
    Ok((StatusCode::CREATED, Json(row.try_into()?)))
}

/// GET /api/resume/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeResponse>, AppError> {
    let row = store::get_resume(&state.db, id).await?;
    Ok(Json(row.try_into()?))
}

/// PUT /api/resume/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeResponse>, AppError> {
    let ResumeInput(resume) = req.resume;
    validate_resume(&resume, state.parser.patterns())?;

    let row = store::update_resume(&state.db, id, &resume).await?;
    Ok(Json(row.try_into()?))
}

/// DELETE /api/resume/:id
/// Also drops any autosaved draft for the resume.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    store::delete_resume(&state.db, id).await?;
    match discard_draft(&state.redis, id).await {
        Ok(()) | Err(AppError::NotFound(_)) => {}
        Err(e) => tracing::warn!("Resume {id} deleted but its draft was not: {e}"),
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let rows = store::list_resumes(&state.db, params.user_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ResumeSummary {
                id: row.id,
                title: row.title,
                ats_score: row.ats_score,
                updated_at: row.updated_at,
            })
            .collect(),
    ))
}

/// PUT /api/resume/:id/draft
/// Drafts are work in progress and skip validation.
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DraftRequest>,
) -> Result<StatusCode, AppError> {
    let ResumeInput(resume) = req.resume;
    save_draft(&state.redis, id, &resume, state.config.draft_ttl_secs).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/resume/:id/draft
pub async fn handle_load_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeData>, AppError> {
    Ok(Json(load_draft(&state.redis, id).await?))
}

/// DELETE /api/resume/:id/draft
pub async fn handle_discard_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    discard_draft(&state.redis, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/resume/:id/score
pub async fn handle_score_stored(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScoreStoredRequest>,
) -> Result<Json<AtsCheckResponse>, AppError> {
    let row = store::get_resume(&state.db, id).await?;
    let ResumeResponse { resume, .. } = row.try_into()?;

    let input = AtsInput {
        resume_text: resume.to_plain_text(),
        job_description: req.job_description,
    };
    let report = state.ats_scorer.score(&input).await?;
    store::record_ats_score(&state.db, id, report.overall_score).await?;

    Ok(Json(AtsCheckResponse {
        report,
        completeness: Some(score_resume(&resume)),
    }))
}

/// POST /api/resume/convert
pub async fn handle_convert(Json(body): Json<Value>) -> Result<Json<ConvertResponse>, AppError> {
    Ok(Json(convert_payload(body)?))
}

/// Converts a document to the other shape.
fn convert_payload(body: Value) -> Result<ConvertResponse, AppError> {
    let payload = ResumePayload::from_value(body)
        .map_err(|e| AppError::Validation(format!("unrecognised resume document: {e}")))?;

    let (from, to, converted) = match payload {
        ResumePayload::Legacy(legacy) => {
            ("legacy", "current", serde_json::to_value(ResumeData::from(legacy)))
        }
        ResumePayload::Current(current) => (
            "current",
            "legacy",
            serde_json::to_value(LegacyResumeData::from(&current)),
        ),
    };
    let resume = converted
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode resume: {e}")))?;

    Ok(ConvertResponse { from, to, resume })
}
