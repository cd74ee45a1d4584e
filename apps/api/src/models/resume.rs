//! The Resume document as the browser builder edits it, plus the flat legacy
//! shape older clients still send and the converters between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Current document shape
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub job_title: String,
    /// Data URL or remote URL of the profile photo.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
    pub description: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontChoice {
    #[default]
    Inter,
    Roboto,
    Georgia,
    Merriweather,
    SourceSans,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Spacious,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoMode {
    #[default]
    None,
    Circle,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
    Creative,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    /// `#RRGGBB`
    pub accent_color: String,
    pub font: FontChoice,
    pub density: Density,
    pub photo_mode: PhotoMode,
    pub template: TemplateId,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent_color: "#2563eb".to_string(),
            font: FontChoice::default(),
            density: Density::default(),
            photo_mode: PhotoMode::default(),
            template: TemplateId::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub skills: Vec<String>,
    pub theme: Theme,
}

impl ResumeData {
    /// Email, phone, location and links joined with ` | `, skipping blanks.
    pub fn contact_line(&self) -> String {
        let p = &self.personal_info;
        [&p.email, &p.phone, &p.location, &p.linkedin, &p.website]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Flattens the document into plain text for keyword scoring.
    pub fn to_plain_text(&self) -> String {
        let mut out: Vec<String> = Vec::new();
        let p = &self.personal_info;

        push_nonempty(&mut out, &p.full_name);
        push_nonempty(&mut out, &p.job_title);
        push_nonempty(&mut out, &self.contact_line());

        if !self.summary.trim().is_empty() {
            out.push("Summary".to_string());
            out.push(self.summary.trim().to_string());
        }

        if !self.experience.is_empty() {
            out.push("Experience".to_string());
            for exp in &self.experience {
                let end = if exp.current { "Present" } else { exp.end_date.as_str() };
                let heading = format!(
                    "{} at {} ({} - {})",
                    exp.job_title.trim(),
                    exp.company.trim(),
                    exp.start_date.trim(),
                    end.trim()
                );
                out.push(heading);
                push_nonempty(&mut out, &exp.description);
                for bullet in &exp.bullets {
                    push_nonempty(&mut out, &format!("- {}", bullet.trim()));
                }
            }
        }

        if !self.education.is_empty() {
            out.push("Education".to_string());
            for edu in &self.education {
                out.push(format!(
                    "{}, {} ({} - {})",
                    edu.degree.trim(),
                    edu.institution.trim(),
                    edu.start_date.trim(),
                    edu.end_date.trim()
                ));
                push_nonempty(&mut out, &edu.description);
            }
        }

        if !self.projects.is_empty() {
            out.push("Projects".to_string());
            for project in &self.projects {
                out.push(project.name.trim().to_string());
                push_nonempty(&mut out, &project.description);
                if !project.technologies.is_empty() {
                    out.push(format!("Technologies: {}", project.technologies.join(", ")));
                }
            }
        }

        if !self.skills.is_empty() {
            out.push("Skills".to_string());
            out.push(self.skills.join(", "));
        }

        out.join("\n")
    }
}

fn push_nonempty(out: &mut Vec<String>, s: &str) {
    let s = s.trim();
    if !s.is_empty() && s != "-" {
        out.push(s.to_string());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Legacy flat shape
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyExperience {
    pub title: String,
    pub company: String,
    /// Free-form, e.g. "2019 - 2021" or "Jan 2020 - Present".
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyEducation {
    pub degree: String,
    pub school: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyProject {
    pub title: String,
    pub description: String,
    /// Comma separated.
    pub tech: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyResumeData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: String,
    pub summary: String,
    pub experience: Vec<LegacyExperience>,
    pub education: Vec<LegacyEducation>,
    /// Comma separated.
    pub skills: String,
    pub projects: Vec<LegacyProject>,
}

/// Splits "start - end" on the first dash-like separator.
/// Returns `(start, end, current)`. Unknown formats keep the whole string as start.
fn split_duration(duration: &str) -> (String, String, bool) {
    let duration = duration.trim();
    let spaced = [" - ", " – ", " — ", " to "]
        .into_iter()
        .find_map(|sep| duration.split_once(sep));
    // A bare dash only separates a range when both sides are dates:
    // "2019-2021" splits, "Mid-2019" and "2019-05" do not.
    let bare = || {
        ["-", "–"]
            .into_iter()
            .find_map(|sep| duration.split_once(sep))
            .filter(|(start, end)| ends_in_year(start) && (ends_in_year(end) || is_ongoing(end)))
    };

    match spaced.or_else(bare) {
        Some((start, end)) => {
            let end = end.trim();
            let current = is_ongoing(end);
            let end = if current { String::new() } else { end.to_string() };
            (start.trim().to_string(), end, current)
        }
        None => (duration.to_string(), String::new(), false),
    }
}

fn is_ongoing(end: &str) -> bool {
    matches!(
        end.trim().to_ascii_lowercase().as_str(),
        "present" | "current" | "now" | "ongoing"
    )
}

/// `2019`, `Jan 2019`, `03/2019`.
fn ends_in_year(value: &str) -> bool {
    let digits = value
        .trim()
        .rsplit(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    digits.len() == 4 && matches!(digits.parse::<u32>(), Ok(1900..=2099))
}

fn join_duration(start: &str, end: &str, current: bool) -> String {
    let end = if current { "Present" } else { end.trim() };
    match (start.trim().is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start.trim().to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{} - {}", start.trim(), end),
    }
}

pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl From<LegacyResumeData> for ResumeData {
    fn from(legacy: LegacyResumeData) -> Self {
        let experience = legacy
            .experience
            .into_iter()
            .map(|e| {
                let (start_date, end_date, current) = split_duration(&e.duration);
                Experience {
                    job_title: e.title,
                    company: e.company,
                    start_date,
                    end_date,
                    current,
                    description: e.description,
                    ..Default::default()
                }
            })
            .collect();

        let education = legacy
            .education
            .into_iter()
            .map(|e| Education {
                degree: e.degree,
                institution: e.school,
                end_date: e.year,
                ..Default::default()
            })
            .collect();

        let projects = legacy
            .projects
            .into_iter()
            .map(|p| Project {
                name: p.title,
                description: p.description,
                technologies: split_list(&p.tech),
                link: String::new(),
            })
            .collect();

        ResumeData {
            personal_info: PersonalInfo {
                full_name: legacy.name,
                email: legacy.email,
                phone: legacy.phone,
                location: legacy.address,
                linkedin: legacy.linkedin,
                ..Default::default()
            },
            summary: legacy.summary,
            experience,
            education,
            projects,
            skills: split_list(&legacy.skills),
            theme: Theme::default(),
        }
    }
}

impl From<&ResumeData> for LegacyResumeData {
    fn from(resume: &ResumeData) -> Self {
        let p = &resume.personal_info;
        LegacyResumeData {
            name: p.full_name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            address: p.location.clone(),
            linkedin: p.linkedin.clone(),
            summary: resume.summary.clone(),
            experience: resume
                .experience
                .iter()
                .map(|e| {
                    // Legacy has no bullet list; fold bullets into the description.
                    let mut description = e.description.trim().to_string();
                    for bullet in e.bullets.iter().filter(|b| !b.trim().is_empty()) {
                        if !description.is_empty() {
                            description.push('\n');
                        }
                        description.push_str("• ");
                        description.push_str(bullet.trim());
                    }
                    LegacyExperience {
                        title: e.job_title.clone(),
                        company: e.company.clone(),
                        duration: join_duration(&e.start_date, &e.end_date, e.current),
                        description,
                    }
                })
                .collect(),
            education: resume
                .education
                .iter()
                .map(|e| LegacyEducation {
                    degree: e.degree.clone(),
                    school: e.institution.clone(),
                    year: if e.end_date.trim().is_empty() {
                        e.start_date.clone()
                    } else {
                        e.end_date.clone()
                    },
                })
                .collect(),
            skills: resume.skills.join(", "),
            projects: resume
                .projects
                .iter()
                .map(|p| LegacyProject {
                    title: p.name.clone(),
                    description: p.description.clone(),
                    tech: p.technologies.join(", "),
                })
                .collect(),
        }
    }
}

/// Either document shape, as accepted on the wire.
/// A body with a top-level `personalInfo` object is never read as legacy.
#[derive(Debug, Clone)]
pub enum ResumePayload {
    Current(ResumeData),
    Legacy(LegacyResumeData),
}

impl ResumePayload {
    pub fn into_resume(self) -> ResumeData {
        match self {
            ResumePayload::Current(data) => data,
            ResumePayload::Legacy(legacy) => legacy.into(),
        }
    }

    /// Detects the shape from raw JSON. Both structs default every field, so
    /// untagged deserialization alone cannot tell them apart.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let is_legacy = value.get("personalInfo").is_none()
            && (value.get("name").is_some()
                || value.get("skills").map(Value::is_string).unwrap_or(false));

        if is_legacy {
            serde_json::from_value(value).map(ResumePayload::Legacy)
        } else {
            serde_json::from_value(value).map(ResumePayload::Current)
        }
    }
}

impl<'de> Deserialize<'de> for ResumeInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ResumePayload::from_value(value)
            .map(|p| ResumeInput(p.into_resume()))
            .map_err(serde::de::Error::custom)
    }
}

/// A resume body in either shape, already converted to `ResumeData`.
/// Use this as the field type in request structs.
#[derive(Debug, Clone)]
pub struct ResumeInput(pub ResumeData);

// ────────────────────────────────────────────────────────────────────────────
// Persistence row
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub data: Value,
    pub ats_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    /// Decodes the stored JSONB document. Rows written by older clients may
    /// carry the legacy shape.
    pub fn document(&self) -> Result<ResumeData, serde_json::Error> {
        ResumePayload::from_value(self.data.clone()).map(ResumePayload::into_resume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "+44 20 7946 0958".to_string(),
                location: "London".to_string(),
                ..Default::default()
            },
            summary: "Backend engineer focused on Rust services.".to_string(),
            experience: vec![Experience {
                job_title: "Senior Engineer".to_string(),
                company: "Analytical Engines".to_string(),
                start_date: "2019".to_string(),
                current: true,
                description: "Built the scoring pipeline.".to_string(),
                bullets: vec!["Cut p99 latency by 40%".to_string()],
                ..Default::default()
            }],
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_split_duration_range() {
        assert_eq!(
            split_duration("2019 - 2021"),
            ("2019".to_string(), "2021".to_string(), false)
        );
    }

    #[test]
    fn test_split_duration_present_sets_current() {
        assert_eq!(
            split_duration("Jan 2020 - Present"),
            ("Jan 2020".to_string(), String::new(), true)
        );
    }

    #[test]
    fn test_split_duration_unknown_format_kept_as_start() {
        assert_eq!(
            split_duration("Summer 2018"),
            ("Summer 2018".to_string(), String::new(), false)
        );
    }

    #[test]
    fn test_split_duration_keeps_hyphenated_single_dates() {
        assert_eq!(
            split_duration("Mid-2019"),
            ("Mid-2019".to_string(), String::new(), false)
        );
        assert_eq!(
            split_duration("2019-05"),
            ("2019-05".to_string(), String::new(), false)
        );
    }

    #[test]
    fn test_split_duration_bare_dash_between_dates() {
        assert_eq!(
            split_duration("2019-2021"),
            ("2019".to_string(), "2021".to_string(), false)
        );
        assert_eq!(
            split_duration("Mar 2020–Present"),
            ("Mar 2020".to_string(), String::new(), true)
        );
    }

    #[test]
    fn test_legacy_to_current_splits_skills_and_drops_blanks() {
        let legacy = LegacyResumeData {
            name: "Grace Hopper".to_string(),
            skills: "COBOL, , compilers ,leadership".to_string(),
            experience: vec![LegacyExperience {
                title: "Rear Admiral".to_string(),
                company: "US Navy".to_string(),
                duration: "1967 - 1986".to_string(),
                description: "Standardized languages".to_string(),
            }],
            ..Default::default()
        };
        let resume: ResumeData = legacy.into();
        assert_eq!(resume.personal_info.full_name, "Grace Hopper");
        assert_eq!(resume.skills, vec!["COBOL", "compilers", "leadership"]);
        assert_eq!(resume.experience[0].start_date, "1967");
        assert_eq!(resume.experience[0].end_date, "1986");
    }

    #[test]
    fn test_current_to_legacy_folds_bullets_and_marks_present() {
        let legacy = LegacyResumeData::from(&sample_resume());
        assert_eq!(legacy.experience[0].duration, "2019 - Present");
        assert!(legacy.experience[0].description.contains("• Cut p99 latency by 40%"));
        assert_eq!(legacy.skills, "Rust, PostgreSQL");
        assert_eq!(legacy.address, "London");
    }

    #[test]
    fn test_payload_detects_legacy_shape() {
        let value = json!({"name": "Linus", "skills": "C, git"});
        let resume = ResumePayload::from_value(value).unwrap().into_resume();
        assert_eq!(resume.personal_info.full_name, "Linus");
        assert_eq!(resume.skills, vec!["C", "git"]);
    }

    #[test]
    fn test_payload_detects_current_shape() {
        let value = json!({
            "personalInfo": {"fullName": "Linus", "email": "l@example.org"},
            "skills": ["C", "git"],
            "theme": {"density": "compact", "template": "modern"}
        });
        let resume = ResumePayload::from_value(value).unwrap().into_resume();
        assert_eq!(resume.personal_info.email, "l@example.org");
        assert_eq!(resume.theme.density, Density::Compact);
        assert_eq!(resume.theme.template, TemplateId::Modern);
        assert_eq!(resume.theme.accent_color, "#2563eb");
    }

    #[test]
    fn test_resume_input_deserializes_either_shape() {
        let input: ResumeInput = serde_json::from_str(r#"{"name": "Ken"}"#).unwrap();
        assert_eq!(input.0.personal_info.full_name, "Ken");
    }

    #[test]
    fn test_plain_text_contains_every_section() {
        let text = sample_resume().to_plain_text();
        assert!(text.starts_with("Ada Lovelace"));
        assert!(text.contains("ada@example.com | +44 20 7946 0958 | London"));
        assert!(text.contains("Senior Engineer at Analytical Engines (2019 - Present)"));
        assert!(text.contains("- Cut p99 latency by 40%"));
        assert!(text.contains("Rust, PostgreSQL"));
    }

    #[test]
    fn test_plain_text_of_empty_document_is_empty() {
        assert!(ResumeData::default().to_plain_text().is_empty());
    }
}
