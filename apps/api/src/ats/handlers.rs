use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ats::completeness::{score_resume, CompletenessReport};
use crate::ats::scorer::{AtsInput, AtsReport};
use crate::errors::AppError;
use crate::models::resume::ResumeInput;
use crate::resume::parser::extract_text;
use crate::resume::upload::read_upload_form;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AtsCheckRequest {
    #[serde(default, alias = "resumeText")]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume: Option<ResumeInput>,
    #[serde(default, alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Serialize)]
pub struct AtsCheckResponse {
    pub report: AtsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<CompletenessReport>,
}

/// POST /api/ats/check
pub async fn handle_ats_check(
    State(state): State<AppState>,
    Json(req): Json<AtsCheckRequest>,
) -> Result<Json<AtsCheckResponse>, AppError> {
    let (resume_text, completeness) = select_resume_input(req.resume, req.resume_text)?;

    let input = AtsInput {
        resume_text,
        job_description: req.job_description,
    };
    let report = state.ats_scorer.score(&input).await?;
    info!(
        "ATS check scored {} ({})",
        report.overall_score, report.scorer_backend
    );

    Ok(Json(AtsCheckResponse {
        report,
        completeness,
    }))
}

/// A structured resume wins over raw text and also gets a completeness report.
fn select_resume_input(
    resume: Option<ResumeInput>,
    resume_text: Option<String>,
) -> Result<(String, Option<CompletenessReport>), AppError> {
    match (resume, resume_text) {
        (Some(ResumeInput(resume)), _) => Ok((resume.to_plain_text(), Some(score_resume(&resume)))),
        (None, Some(text)) if !text.trim().is_empty() => Ok((text, None)),
        _ => Err(AppError::Validation(
            "provide either resume_text or resume".to_string(),
        )),
    }
}

/// POST /api/ats/check/upload
pub async fn handle_ats_check_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsCheckResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("missing 'resume' file field".to_string()))?;

    let resume_text = extract_text(file.bytes, &file.filename, file.content_type.as_deref()).await?;
    let input = AtsInput {
        resume_text,
        job_description: form.job_description.unwrap_or_default(),
    };
    let report = state.ats_scorer.score(&input).await?;

    Ok(Json(AtsCheckResponse {
        report,
        completeness: None,
    }))
}
