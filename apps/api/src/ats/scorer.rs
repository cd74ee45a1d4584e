//! ATS scoring: pluggable, trait-based scorer that measures resume text against a JD.
//!
//! Default: `KeywordAtsScorer` (pure-Rust, deterministic, fully testable).
//! Optional: `LlmAtsScorer` (semantic verdict from the LLM, blended with the keyword score).
//!
//! `AppState` holds an `Arc<dyn AtsScorer>`, swapped at startup via `ATS_SCORER`.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ats::contact::TextPatterns;
use crate::ats::keywords::{extract_keywords, SkillMatcher};
use crate::ats::normalize::{tokenize, word_count};
use crate::ats::prompts::{ATS_REVIEW_PROMPT_TEMPLATE, ATS_REVIEW_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{clip, fill_template, MAX_PROMPT_CHARS};
use crate::llm_client::LlmClient;

/// Missing keywords reported per check.
const MAX_GAPS: usize = 15;
/// Sub-scores below this produce a tip.
const WEAK_SUBSCORE: u32 = 60;

// ────────────────────────────────────────────────────────────────────────────
// Input / output data models (shared across all scorer backends)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsInput {
    pub resume_text: String,
    pub job_description: String,
}

/// Per-factor scores, each 0 – 100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: u32,
    pub skills: u32,
    pub experience: u32,
    pub contact: u32,
    pub length: u32,
}

/// A JD keyword the resume does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGap {
    pub keyword: String,
    pub jd_frequency: u32,
    /// Resume section where the keyword most naturally belongs.
    pub suggested_section: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => Rating::Excellent,
            s if s >= 60 => Rating::Good,
            s if s >= 40 => Rating::Fair,
            _ => Rating::Poor,
        }
    }
}

/// Full ATS report returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtsReport {
    pub overall_score: u32, // 0 – 100
    pub rating: Rating,
    pub breakdown: ScoreBreakdown,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<KeywordGap>,
    pub tips: Vec<String>,
    pub scorer_backend: String, // "keyword" | "llm"
}

/// Blend weights for the five factors. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keyword_match: f64,
    pub skills: f64,
    pub experience: f64,
    pub contact: f64,
    pub length: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keyword_match: 0.40,
            skills: 0.20,
            experience: 0.15,
            contact: 0.15,
            length: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.keyword_match,
            self.skills,
            self.experience,
            self.contact,
            self.length,
        ];
        if all.iter().any(|w| *w < 0.0) {
            return Err("score weights must be non-negative".to_string());
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("score weights must sum to 1.0, got {sum:.3}"));
        }
        Ok(())
    }

    fn blend(&self, b: &ScoreBreakdown) -> u32 {
        let total = self.keyword_match * b.keyword_match as f64
            + self.skills * b.skills as f64
            + self.experience * b.experience as f64
            + self.contact * b.contact as f64
            + self.length * b.length as f64;
        total.round().clamp(0.0, 100.0) as u32
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The ATS scorer trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn AtsScorer>`.
#[async_trait]
pub trait AtsScorer: Send + Sync {
    async fn score(&self, input: &AtsInput) -> Result<AtsReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordAtsScorer (default)
// ────────────────────────────────────────────────────────────────────────────

/// Pure-Rust keyword scorer. Fast, deterministic, no LLM call.
///
/// Algorithm:
/// 1. keyword_match = |JD keywords ∩ resume tokens| / |JD keywords| × 100
/// 2. experience = resume years vs JD years (regex on "N+ years")
/// 3. skills = JD vocabulary skills covered by the resume
/// 4. length = word-count bucket
/// 5. contact = email 40 + phone 40 + LinkedIn/URL 20
/// 6. overall = Σ weight × sub-score, rounded
pub struct KeywordAtsScorer {
    weights: ScoreWeights,
    patterns: TextPatterns,
    skills: SkillMatcher,
}

impl KeywordAtsScorer {
    pub fn new(
        weights: ScoreWeights,
        patterns: TextPatterns,
        skills: SkillMatcher,
    ) -> Result<Self, String> {
        weights.validate()?;
        Ok(Self {
            weights,
            patterns,
            skills,
        })
    }

    /// Synchronous scoring core, shared with `LlmAtsScorer`.
    pub fn compute(&self, input: &AtsInput) -> Result<AtsReport, AppError> {
        compute_keyword_report(&self.weights, &self.patterns, &self.skills, input)
    }
}

#[async_trait]
impl AtsScorer for KeywordAtsScorer {
    async fn score(&self, input: &AtsInput) -> Result<AtsReport, AppError> {
        self.compute(input)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAtsScorer: semantic verdict blended with the keyword score
// ────────────────────────────────────────────────────────────────────────────

/// What the LLM is asked to return.
#[derive(Debug, Clone, Deserialize)]
struct LlmVerdict {
    score: u32,
    #[serde(default)]
    tips: Vec<String>,
}

/// Semantic scorer. Falls back to the keyword report if the LLM call fails.
pub struct LlmAtsScorer {
    keyword: KeywordAtsScorer,
    llm: LlmClient,
}

impl LlmAtsScorer {
    pub fn new(keyword: KeywordAtsScorer, llm: LlmClient) -> Self {
        Self { keyword, llm }
    }
}

#[async_trait]
impl AtsScorer for LlmAtsScorer {
    async fn score(&self, input: &AtsInput) -> Result<AtsReport, AppError> {
        let mut report = self.keyword.compute(input)?;

        let prompt = fill_template(
            ATS_REVIEW_PROMPT_TEMPLATE,
            &[
                ("job_description", clip(&input.job_description, MAX_PROMPT_CHARS)),
                ("resume_text", clip(&input.resume_text, MAX_PROMPT_CHARS)),
            ],
        );

        match self.llm.complete_json::<LlmVerdict>(&prompt, ATS_REVIEW_SYSTEM).await {
            Ok(verdict) => {
                let semantic = verdict.score.min(100);
                report.overall_score = blend_semantic(report.overall_score, semantic);
                report.rating = Rating::from_score(report.overall_score);
                report.tips.extend(verdict.tips);
                report.scorer_backend = "llm".to_string();
            }
            Err(e) => {
                warn!("LLM ATS review failed, using keyword score only: {e}");
            }
        }

        Ok(report)
    }
}

fn blend_semantic(keyword_score: u32, semantic_score: u32) -> u32 {
    ((keyword_score as f64 + semantic_score as f64) / 2.0).round() as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_keyword_report(
    weights: &ScoreWeights,
    patterns: &TextPatterns,
    skills: &SkillMatcher,
    input: &AtsInput,
) -> Result<AtsReport, AppError> {
    if input.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume text cannot be empty".to_string()));
    }

    let resume_tokens: HashSet<String> = tokenize(&input.resume_text).into_iter().collect();
    let jd_keywords = extract_keywords(&input.job_description, skills);

    let mut matched_keywords = Vec::new();
    let mut missing_keywords = Vec::new();
    for kw in &jd_keywords {
        if resume_tokens.contains(&kw.keyword) {
            matched_keywords.push(kw.keyword.clone());
        } else {
            let suggested_section = if skills.is_skill(&kw.keyword) {
                "skills"
            } else {
                "experience"
            };
            missing_keywords.push(KeywordGap {
                keyword: kw.keyword.clone(),
                jd_frequency: kw.frequency,
                suggested_section: suggested_section.to_string(),
            });
        }
    }
    // jd_keywords is frequency-ordered, so the gaps already are too.
    missing_keywords.truncate(MAX_GAPS);

    let keyword_match = ratio_score(matched_keywords.len(), jd_keywords.len());

    let breakdown = ScoreBreakdown {
        keyword_match,
        skills: skills_score(skills, &input.resume_text, &input.job_description),
        experience: experience_score(patterns, &input.resume_text, &input.job_description),
        contact: contact_score(patterns, &input.resume_text),
        length: length_score(word_count(&input.resume_text)),
    };

    debug!(
        "ATS sub-scores: keyword={} skills={} experience={} contact={} length={}",
        breakdown.keyword_match,
        breakdown.skills,
        breakdown.experience,
        breakdown.contact,
        breakdown.length
    );

    let overall_score = weights.blend(&breakdown);
    let tips = build_tips(&breakdown, jd_keywords.is_empty(), &missing_keywords);

    Ok(AtsReport {
        overall_score,
        rating: Rating::from_score(overall_score),
        breakdown,
        matched_keywords,
        missing_keywords,
        tips,
        scorer_backend: "keyword".to_string(),
    })
}

fn ratio_score(hit: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((hit as f64 / total as f64) * 100.0).round() as u32
}

/// JD-required vocabulary skills covered by the resume. When the JD names
/// none, falls back to how many vocabulary skills the resume lists (10 = full).
fn skills_score(skills: &SkillMatcher, resume_text: &str, jd: &str) -> u32 {
    let resume_skills: HashSet<&str> = skills.skills_in(resume_text).into_iter().collect();
    let jd_skills = skills.skills_in(jd);

    if jd_skills.is_empty() {
        return (resume_skills.len().min(10) * 10) as u32;
    }
    let covered = jd_skills.iter().filter(|s| resume_skills.contains(*s)).count();
    ratio_score(covered, jd_skills.len())
}

fn experience_score(patterns: &TextPatterns, resume_text: &str, jd: &str) -> u32 {
    let resume_years = patterns.max_years(resume_text);
    match patterns.max_years(jd) {
        Some(required) if required > 0 => {
            let have = resume_years.unwrap_or(0);
            ((have as f64 / required as f64).min(1.0) * 100.0).round() as u32
        }
        _ => {
            if resume_years.is_some() {
                100
            } else {
                50
            }
        }
    }
}

fn contact_score(patterns: &TextPatterns, resume_text: &str) -> u32 {
    let mut score = 0;
    if patterns.find_email(resume_text).is_some() {
        score += 40;
    }
    if patterns.find_phone(resume_text).is_some() {
        score += 40;
    }
    if patterns.find_linkedin(resume_text).is_some() || patterns.find_website(resume_text).is_some()
    {
        score += 20;
    }
    score
}

fn length_score(words: usize) -> u32 {
    match words {
        w if w < 150 => 40,
        w if w < 300 => 70,
        w if w <= 800 => 100,
        w if w <= 1200 => 80,
        _ => 60,
    }
}

/// One tip per weak factor, then the top missing keywords.
fn build_tips(b: &ScoreBreakdown, jd_empty: bool, gaps: &[KeywordGap]) -> Vec<String> {
    let mut tips = Vec::new();

    if jd_empty {
        tips.push(
            "Paste the full job description to get a keyword match score.".to_string(),
        );
    } else if b.keyword_match < WEAK_SUBSCORE {
        let top: Vec<&str> = gaps.iter().take(5).map(|g| g.keyword.as_str()).collect();
        tips.push(format!(
            "Only {}% of the job description keywords appear in your resume. Work in: {}.",
            b.keyword_match,
            top.join(", ")
        ));
    }
    if b.skills < WEAK_SUBSCORE {
        tips.push(
            "List the tools and skills the posting asks for in a dedicated Skills section."
                .to_string(),
        );
    }
    if b.experience < WEAK_SUBSCORE {
        tips.push(
            "State your years of experience explicitly (e.g. \"6 years building backend services\")."
                .to_string(),
        );
    }
    if b.contact < WEAK_SUBSCORE {
        tips.push("Add a professional email address and phone number at the top.".to_string());
    } else if b.contact < 100 {
        tips.push("Add your LinkedIn profile or portfolio link.".to_string());
    }
    if b.length < WEAK_SUBSCORE {
        tips.push(
            "Your resume is short. Expand experience entries with concrete, quantified results."
                .to_string(),
        );
    } else if b.length < 100 {
        tips.push("Aim for 300–800 words; trim or expand to fit one or two pages.".to_string());
    }

    for gap in gaps.iter().take(3) {
        tips.push(format!(
            "Consider mentioning '{}' in your {} section.",
            gap.keyword, gap.suggested_section
        ));
    }

    tips
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Backend Engineer. Requirements: 5+ years building services in Rust \
        and PostgreSQL. Experience with Docker and Kubernetes. Strong communication.";

    fn scorer() -> KeywordAtsScorer {
        KeywordAtsScorer::new(
            ScoreWeights::default(),
            TextPatterns::new().unwrap(),
            SkillMatcher::new().unwrap(),
        )
        .unwrap()
    }

    fn filler(words: usize) -> String {
        vec!["delivered"; words].join(" ")
    }

    fn strong_resume() -> String {
        format!(
            "Jane Doe\njane@example.com | (555) 123-4567 | linkedin.com/in/janedoe\n\
             Backend Engineer with 7 years building services in Rust and PostgreSQL.\n\
             Shipped Docker and Kubernetes deployments; clear communication with stakeholders.\n{}",
            filler(320)
        )
    }

    fn input(resume: &str, jd: &str) -> AtsInput {
        AtsInput {
            resume_text: resume.to_string(),
            job_description: jd.to_string(),
        }
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(ScoreWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let w = ScoreWeights {
            keyword_match: 0.9,
            ..ScoreWeights::default()
        };
        assert!(w.validate().is_err());
        assert!(KeywordAtsScorer::new(w, TextPatterns::new().unwrap(), SkillMatcher::new().unwrap())
            .is_err());
    }

    #[test]
    fn test_strong_resume_scores_excellent() {
        let report = scorer().compute(&input(&strong_resume(), JD)).unwrap();
        assert_eq!(report.breakdown.contact, 100);
        assert_eq!(report.breakdown.experience, 100);
        assert_eq!(report.breakdown.skills, 100);
        assert_eq!(report.breakdown.length, 100);
        assert!(report.overall_score >= 80, "got {}", report.overall_score);
        assert_eq!(report.rating, Rating::Excellent);
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[test]
    fn test_missing_keywords_become_gaps() {
        let report = scorer()
            .compute(&input("Frontend developer using React.", JD))
            .unwrap();
        let gaps: Vec<&str> = report
            .missing_keywords
            .iter()
            .map(|g| g.keyword.as_str())
            .collect();
        assert!(gaps.contains(&"rust"));
        assert!(gaps.contains(&"kubernetes"));
        let rust_gap = report
            .missing_keywords
            .iter()
            .find(|g| g.keyword == "rust")
            .unwrap();
        assert_eq!(rust_gap.suggested_section, "skills");
        assert!(report.overall_score < 40, "got {}", report.overall_score);
        assert_eq!(report.rating, Rating::Poor);
    }

    #[test]
    fn test_keyword_match_is_intersection_ratio() {
        // JD keywords: "kubernetes", "terraform"; resume has one of two.
        let report = scorer()
            .compute(&input("Ran Kubernetes clusters", "Kubernetes Terraform"))
            .unwrap();
        assert_eq!(report.breakdown.keyword_match, 50);
        assert_eq!(report.matched_keywords, vec!["kubernetes"]);
    }

    #[test]
    fn test_experience_ratio_against_required_years() {
        let p = TextPatterns::new().unwrap();
        assert_eq!(experience_score(&p, "2 years of Go", "4+ years required"), 50);
        assert_eq!(experience_score(&p, "10 years of Go", "4+ years required"), 100);
        assert_eq!(experience_score(&p, "Go developer", "4+ years required"), 0);
    }

    #[test]
    fn test_experience_without_jd_years() {
        let p = TextPatterns::new().unwrap();
        assert_eq!(experience_score(&p, "3 years of Go", "Go developer"), 100);
        assert_eq!(experience_score(&p, "Go developer", "Go developer"), 50);
    }

    #[test]
    fn test_skills_fallback_counts_resume_skills() {
        // No vocabulary skills in the JD; resume lists three.
        let skills = SkillMatcher::new().unwrap();
        assert_eq!(
            skills_score(&skills, "Rust, Docker and SQL", "Friendly bakery assistant"),
            30
        );
    }

    #[test]
    fn test_length_buckets() {
        assert_eq!(length_score(100), 40);
        assert_eq!(length_score(200), 70);
        assert_eq!(length_score(300), 100);
        assert_eq!(length_score(800), 100);
        assert_eq!(length_score(1000), 80);
        assert_eq!(length_score(5000), 60);
    }

    #[test]
    fn test_contact_score_parts() {
        let p = TextPatterns::new().unwrap();
        assert_eq!(contact_score(&p, "a@b.io"), 40);
        assert_eq!(contact_score(&p, "a@b.io 555-123-4567"), 80);
        assert_eq!(contact_score(&p, "a@b.io 555-123-4567 https://a.dev"), 100);
        assert_eq!(contact_score(&p, "nothing"), 0);
    }

    #[test]
    fn test_contact_score_ignores_counts_and_years() {
        let p = TextPatterns::new().unwrap();
        assert_eq!(
            contact_score(&p, "Processed 25000000 records across 2019 2020 2021 audits"),
            0
        );
    }

    #[test]
    fn test_empty_jd_scores_zero_keywords_with_tip() {
        let report = scorer().compute(&input(&strong_resume(), "")).unwrap();
        assert_eq!(report.breakdown.keyword_match, 0);
        assert!(report.missing_keywords.is_empty());
        assert!(report.tips[0].contains("job description"));
    }

    #[test]
    fn test_empty_resume_is_validation_error() {
        let err = scorer().compute(&input("   ", JD)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_gaps_capped() {
        let jd: String = (0..40).map(|i| format!("keyword{i} ")).collect();
        let report = scorer().compute(&input("unrelated text", &jd)).unwrap();
        assert_eq!(report.missing_keywords.len(), MAX_GAPS);
    }

    #[test]
    fn test_overall_score_bounded() {
        let report = scorer().compute(&input(&strong_resume(), &strong_resume())).unwrap();
        assert!(report.overall_score <= 100);
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(Rating::from_score(80), Rating::Excellent);
        assert_eq!(Rating::from_score(79), Rating::Good);
        assert_eq!(Rating::from_score(40), Rating::Fair);
        assert_eq!(Rating::from_score(39), Rating::Poor);
    }

    #[test]
    fn test_blend_semantic_averages() {
        assert_eq!(blend_semantic(80, 61), 71);
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let scorer: std::sync::Arc<dyn AtsScorer> = std::sync::Arc::new(scorer());
        let report = scorer.score(&input(&strong_resume(), JD)).await.unwrap();
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[tokio::test(start_paused = true)]
    async fn test_llm_scorer_falls_back_to_keyword_report() {
        // Nothing listens on the discard port, so every attempt fails.
        let llm = LlmClient::new(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "test-model".to_string(),
        )
        .unwrap();
        let llm_scorer = LlmAtsScorer::new(scorer(), llm);

        let expected = scorer().compute(&input(&strong_resume(), JD)).unwrap();
        let report = llm_scorer.score(&input(&strong_resume(), JD)).await.unwrap();
        assert_eq!(report.scorer_backend, "keyword");
        assert_eq!(report.overall_score, expected.overall_score);
        assert_eq!(report.tips, expected.tips);
    }

    #[tokio::test]
    async fn test_llm_scorer_still_rejects_empty_resume() {
        let llm = LlmClient::new(
            "test-key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "test-model".to_string(),
        )
        .unwrap();
        let err = LlmAtsScorer::new(scorer(), llm)
            .score(&input("", JD))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
