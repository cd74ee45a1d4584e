use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assist::prompts::{
    BULLETS_PROMPT_TEMPLATE, BULLETS_SYSTEM, SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM,
    SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM,
};
use crate::ats::bullets::{validate_bullets, BulletCheck};
use crate::ats::scorer::AtsInput;
use crate::errors::AppError;
use crate::llm_client::prompts::{
    clip, fill_template, GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM, MAX_PROMPT_CHARS,
};
use crate::models::resume::ResumeInput;
use crate::state::AppState;

const MAX_BULLETS: usize = 5;
const MAX_SKILLS: usize = 12;
const MAX_SUGGESTIONS: usize = 8;
/// Missing keywords handed to the tailoring prompt.
const TAILOR_KEYWORDS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SummaryRequest {
    pub resume: ResumeInput,
    #[serde(default, alias = "jobDescription")]
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Deserialize)]
pub struct BulletsRequest {
    #[serde(default, alias = "jobTitle")]
    pub job_title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize)]
pub struct BulletsResponse {
    pub bullets: Vec<String>,
    pub check: BulletCheck,
}

#[derive(Deserialize)]
pub struct SkillsRequest {
    #[serde(default, alias = "jobTitle")]
    pub job_title: String,
    #[serde(default, alias = "jobDescription")]
    pub job_description: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
pub struct TailorRequest {
    pub resume: ResumeInput,
    #[serde(default, alias = "jobDescription")]
    pub job_description: String,
}

#[derive(Serialize)]
pub struct TailorResponse {
    pub suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Deserialize)]
struct BulletsOutput {
    bullets: Vec<String>,
}

#[derive(Deserialize)]
struct SuggestionsOutput {
    suggestions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let llm = state.llm()?;
    let resume_text = req.resume.0.to_plain_text();
    let resume_text = required(&resume_text, "resume")?;
    let jd = req.job_description.as_deref().unwrap_or_default().trim();

    let prompt = fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("resume_text", clip(resume_text, MAX_PROMPT_CHARS)),
            ("job_description", clip(jd, MAX_PROMPT_CHARS)),
        ],
    );
    let system = format!("{SUMMARY_SYSTEM}\n\n{GROUNDING_INSTRUCTION}");

    let summary = llm
        .complete(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Summary generation failed: {e}")))?;

    Ok(Json(SummaryResponse {
        summary: summary.trim_matches('"').trim().to_string(),
    }))
}

/// POST /api/ai/bullets
///
/// Each generated bullet is run through the impact check so the client can
/// flag any that still lack a metric.
pub async fn handle_bullets(
    State(state): State<AppState>,
    Json(req): Json<BulletsRequest>,
) -> Result<Json<BulletsResponse>, AppError> {
    let llm = state.llm()?;
    let job_title = required(&req.job_title, "job_title")?;
    let description = required(&req.description, "description")?;
    let company = req.company.as_deref().unwrap_or_default().trim();

    let prompt = fill_template(
        BULLETS_PROMPT_TEMPLATE,
        &[
            ("job_title", clip(job_title, MAX_PROMPT_CHARS)),
            ("company", clip(company, MAX_PROMPT_CHARS)),
            ("description", clip(description, MAX_PROMPT_CHARS)),
        ],
    );
    let system = format!("{BULLETS_SYSTEM}\n\n{GROUNDING_INSTRUCTION}\n\n{JSON_ONLY_SYSTEM}");

    let output: BulletsOutput = llm
        .complete_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Bullet generation failed: {e}")))?;

    let bullets = clean_bullets(output.bullets);
    if bullets.is_empty() {
        return Err(AppError::Llm("Bullet generation returned no bullets".to_string()));
    }
    let check = validate_bullets(&bullets);
    info!(
        "Generated {} bullets for '{job_title}' (quantified: {})",
        bullets.len(),
        check.passed
    );

    Ok(Json(BulletsResponse { bullets, check }))
}

/// POST /api/ai/skills
pub async fn handle_skills(
    State(state): State<AppState>,
    Json(req): Json<SkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let llm = state.llm()?;
    let job_title = required(&req.job_title, "job_title")?;
    let jd = req.job_description.as_deref().unwrap_or_default().trim();

    let prompt = fill_template(
        SKILLS_PROMPT_TEMPLATE,
        &[
            ("job_title", clip(job_title, MAX_PROMPT_CHARS)),
            ("job_description", clip(jd, MAX_PROMPT_CHARS)),
        ],
    );
    let system = format!("{SKILLS_SYSTEM}\n\n{JSON_ONLY_SYSTEM}");

    let output: SkillsResponse = llm
        .complete_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Skill suggestion failed: {e}")))?;

    Ok(Json(SkillsResponse {
        skills: dedup_case_insensitive(output.skills, MAX_SKILLS),
    }))
}

/// POST /api/ai/tailor
///
/// Runs the ATS scorer first and feeds its missing keywords to the prompt.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let llm = state.llm()?;
    let resume_text = req.resume.0.to_plain_text();
    let resume_text = required(&resume_text, "resume")?;
    let jd = required(&req.job_description, "job_description")?;

    let report = state
        .ats_scorer
        .score(&AtsInput {
            resume_text: resume_text.to_string(),
            job_description: jd.to_string(),
        })
        .await?;
    let missing_keywords: Vec<String> = report
        .missing_keywords
        .into_iter()
        .take(TAILOR_KEYWORDS)
        .map(|gap| gap.keyword)
        .collect();

    let missing = missing_keywords.join(", ");
    let prompt = fill_template(
        TAILOR_PROMPT_TEMPLATE,
        &[
            ("resume_text", clip(resume_text, MAX_PROMPT_CHARS)),
            ("job_description", clip(jd, MAX_PROMPT_CHARS)),
            ("missing_keywords", missing.as_str()),
        ],
    );
    let system = format!("{TAILOR_SYSTEM}\n\n{GROUNDING_INSTRUCTION}\n\n{JSON_ONLY_SYSTEM}");

    let output: SuggestionsOutput = llm
        .complete_json(&prompt, &system)
        .await
        .map_err(|e| AppError::Llm(format!("Tailoring failed: {e}")))?;

    let suggestions = output
        .suggestions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    Ok(Json(TailorResponse {
        suggestions,
        missing_keywords,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

/// Strips list markers the model adds despite instructions.
fn clean_bullets(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|b| {
            b.trim()
                .trim_start_matches(['•', '-', '*', '–'])
                .trim()
                .trim_end_matches('.')
                .to_string()
        })
        .filter(|b| !b.is_empty())
        .take(MAX_BULLETS)
        .collect()
}

fn dedup_case_insensitive(items: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("  Rust  ", "x").unwrap(), "Rust");
        let err = required("   ", "job_title").unwrap_err();
        assert!(err.to_string().contains("job_title cannot be empty"));
    }

    #[test]
    fn test_clean_bullets_strips_markers_and_caps() {
        let raw = vec![
            "• Built the billing service.".to_string(),
            "- Cut costs by 20%".to_string(),
            "   ".to_string(),
            "Led 4 engineers".to_string(),
            "Shipped v2".to_string(),
            "Wrote docs".to_string(),
            "Extra bullet".to_string(),
        ];
        let bullets = clean_bullets(raw);
        assert_eq!(bullets.len(), MAX_BULLETS);
        assert_eq!(bullets[0], "Built the billing service");
        assert_eq!(bullets[1], "Cut costs by 20%");
    }

    #[test]
    fn test_dedup_case_insensitive_keeps_first_spelling() {
        let skills = vec![
            "PostgreSQL".to_string(),
            "postgresql".to_string(),
            " Rust ".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedup_case_insensitive(skills, 10), vec!["PostgreSQL", "Rust"]);
    }

    #[test]
    fn test_bullets_request_aliases() {
        let req: BulletsRequest =
            serde_json::from_str(r#"{"jobTitle":"SRE","description":"ran on-call"}"#).unwrap();
        assert_eq!(req.job_title, "SRE");
        assert!(req.company.is_none());
    }
}
