use crate::ats::contact::TextPatterns;
use crate::errors::AppError;
use crate::models::resume::ResumeData;

pub const MAX_LIST_ENTRIES: usize = 30;
pub const MAX_SKILLS: usize = 100;

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Checks a document before it is persisted.
/// Collects every failing field into a single `Validation` error.
pub fn validate_resume(resume: &ResumeData, patterns: &TextPatterns) -> Result<(), AppError> {
    let mut problems: Vec<String> = Vec::new();
    let p = &resume.personal_info;

    if p.full_name.trim().is_empty() {
        problems.push("personalInfo.fullName is required".to_string());
    }
    if !p.email.trim().is_empty() && !patterns.is_email(&p.email) {
        problems.push(format!("personalInfo.email '{}' is not a valid email", p.email));
    }
    if !p.phone.trim().is_empty() && !patterns.is_phone(&p.phone) {
        problems.push(format!("personalInfo.phone '{}' is not a valid phone number", p.phone));
    }
    if !is_hex_color(&resume.theme.accent_color) {
        problems.push(format!(
            "theme.accentColor '{}' must be a #RRGGBB color",
            resume.theme.accent_color
        ));
    }

    for (name, len) in [
        ("experience", resume.experience.len()),
        ("education", resume.education.len()),
        ("projects", resume.projects.len()),
    ] {
        if len > MAX_LIST_ENTRIES {
            problems.push(format!("{name} has {len} entries (max {MAX_LIST_ENTRIES})"));
        }
    }
    if resume.skills.len() > MAX_SKILLS {
        problems.push(format!(
            "skills has {} entries (max {MAX_SKILLS})",
            resume.skills.len()
        ));
    }

    for (i, exp) in resume.experience.iter().enumerate() {
        if exp.job_title.trim().is_empty() && exp.company.trim().is_empty() {
            problems.push(format!("experience[{i}] needs a job title or company"));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(problems.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Experience, PersonalInfo};

    fn patterns() -> TextPatterns {
        TextPatterns::new().unwrap()
    }

    fn valid() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 555 123 4567".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_resume_passes() {
        assert!(validate_resume(&valid(), &patterns()).is_ok());
    }

    #[test]
    fn test_missing_name_fails() {
        let mut resume = valid();
        resume.personal_info.full_name = "  ".to_string();
        let err = validate_resume(&resume, &patterns()).unwrap_err();
        assert!(err.to_string().contains("fullName"));
    }

    #[test]
    fn test_collects_every_problem() {
        let mut resume = valid();
        resume.personal_info.email = "jane-at-example".to_string();
        resume.theme.accent_color = "blue".to_string();
        resume.experience.push(Experience::default());
        let msg = validate_resume(&resume, &patterns()).unwrap_err().to_string();
        assert!(msg.contains("email"));
        assert!(msg.contains("accentColor"));
        assert!(msg.contains("experience[0]"));
    }

    #[test]
    fn test_too_many_skills() {
        let mut resume = valid();
        resume.skills = (0..=MAX_SKILLS).map(|i| format!("skill{i}")).collect();
        assert!(validate_resume(&resume, &patterns()).is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("123456#"));
    }
}
