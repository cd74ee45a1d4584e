//! Structured resume score: how complete the document is, section by
//! section, with tips. Works without a job description.

use serde::{Deserialize, Serialize};

use crate::ats::bullets::validate_bullet;
use crate::models::resume::ResumeData;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    /// Points earned out of `max_points`.
    pub points: u32,
    pub max_points: u32,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// 0 – 100
    pub score: u32,
    pub sections: Vec<SectionHealth>,
    pub tips: Vec<String>,
}

const PERSONAL_POINTS: u32 = 20;
const SUMMARY_POINTS: u32 = 15;
const EXPERIENCE_POINTS: u32 = 30;
const EDUCATION_POINTS: u32 = 15;
const SKILLS_POINTS: u32 = 15;
const PROJECTS_POINTS: u32 = 5;

/// Summary length that earns full points.
const FULL_SUMMARY_CHARS: usize = 50;
/// Skill count that earns full points.
const FULL_SKILL_COUNT: usize = 5;

pub fn score_resume(resume: &ResumeData) -> CompletenessReport {
    let sections = vec![
        personal_health(resume),
        summary_health(resume),
        experience_health(resume),
        education_health(resume),
        skills_health(resume),
        projects_health(resume),
    ];

    let score = sections.iter().map(|s| s.points).sum::<u32>().min(100);
    let tips = sections
        .iter()
        .flat_map(|s| s.recommendations.iter().cloned())
        .collect();

    CompletenessReport {
        score,
        sections,
        tips,
    }
}

fn status_for(points: u32, max_points: u32) -> SectionStatus {
    if points == 0 {
        return SectionStatus::Missing;
    }
    match points as f64 / max_points as f64 {
        r if r >= 0.8 => SectionStatus::Strong,
        r if r >= 0.5 => SectionStatus::Moderate,
        _ => SectionStatus::Weak,
    }
}

fn health(section: &str, points: u32, max_points: u32, recommendations: Vec<String>) -> SectionHealth {
    SectionHealth {
        section: section.to_string(),
        points,
        max_points,
        status: status_for(points, max_points),
        recommendations,
    }
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

fn personal_health(resume: &ResumeData) -> SectionHealth {
    let p = &resume.personal_info;
    let mut points = 0;
    let mut recs = Vec::new();

    for (value, label) in [
        (&p.full_name, "your full name"),
        (&p.email, "an email address"),
        (&p.phone, "a phone number"),
    ] {
        if filled(value) {
            points += 5;
        } else {
            recs.push(format!("Add {label} to your personal details."));
        }
    }
    if filled(&p.location) || filled(&p.linkedin) {
        points += 5;
    } else {
        recs.push("Add your location or LinkedIn profile.".to_string());
    }

    health("personal_info", points, PERSONAL_POINTS, recs)
}

fn summary_health(resume: &ResumeData) -> SectionHealth {
    let len = resume.summary.trim().chars().count();
    let (points, recs) = if len >= FULL_SUMMARY_CHARS {
        (SUMMARY_POINTS, vec![])
    } else if len > 0 {
        (
            SUMMARY_POINTS / 2,
            vec!["Expand your summary to 2–3 sentences about your strengths.".to_string()],
        )
    } else {
        (
            0,
            vec!["Add a professional summary tailored to the role.".to_string()],
        )
    };
    health("summary", points, SUMMARY_POINTS, recs)
}

fn experience_health(resume: &ResumeData) -> SectionHealth {
    let entries = &resume.experience;
    if entries.is_empty() {
        return health(
            "experience",
            0,
            EXPERIENCE_POINTS,
            vec!["Add at least one work experience entry.".to_string()],
        );
    }

    let mut recs = Vec::new();

    // Half the points for having entries (2+ = full half), half for described entries.
    let presence = if entries.len() >= 2 {
        EXPERIENCE_POINTS / 2
    } else {
        EXPERIENCE_POINTS / 4
    };
    let described = entries
        .iter()
        .filter(|e| filled(&e.description) || e.bullets.iter().any(|b| filled(b)))
        .count();
    let detail = (EXPERIENCE_POINTS / 2) * described as u32 / entries.len() as u32;

    if entries.len() < 2 {
        recs.push("Add more experience entries to build a complete picture.".to_string());
    }
    if described < entries.len() {
        recs.push(format!(
            "{} experience entries have no description or bullet points.",
            entries.len() - described
        ));
    }

    let unquantified = entries
        .iter()
        .flat_map(|e| e.bullets.iter())
        .filter(|b| filled(b) && !validate_bullet(b).passed)
        .count();
    if unquantified > 0 {
        recs.push(format!(
            "{unquantified} bullet points lack measurable results. Add numbers, percentages or time saved."
        ));
    }

    health("experience", presence + detail, EXPERIENCE_POINTS, recs)
}

fn education_health(resume: &ResumeData) -> SectionHealth {
    let any = resume
        .education
        .iter()
        .any(|e| filled(&e.degree) || filled(&e.institution));
    if any {
        health("education", EDUCATION_POINTS, EDUCATION_POINTS, vec![])
    } else {
        health(
            "education",
            0,
            EDUCATION_POINTS,
            vec!["Add your education background.".to_string()],
        )
    }
}

fn skills_health(resume: &ResumeData) -> SectionHealth {
    let count = resume.skills.iter().filter(|s| filled(s)).count();
    let points = if count >= FULL_SKILL_COUNT {
        SKILLS_POINTS
    } else {
        SKILLS_POINTS * count as u32 / FULL_SKILL_COUNT as u32
    };
    let recs = if count < FULL_SKILL_COUNT {
        vec![format!(
            "List at least {FULL_SKILL_COUNT} relevant skills (you have {count})."
        )]
    } else {
        vec![]
    };
    health("skills", points, SKILLS_POINTS, recs)
}

fn projects_health(resume: &ResumeData) -> SectionHealth {
    if resume.projects.iter().any(|p| filled(&p.name)) {
        health("projects", PROJECTS_POINTS, PROJECTS_POINTS, vec![])
    } else {
        health(
            "projects",
            0,
            PROJECTS_POINTS,
            vec!["Showcase a project that demonstrates your skills.".to_string()],
        )
    }
}
