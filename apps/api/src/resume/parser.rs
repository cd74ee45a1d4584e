//! Resume upload parsing. Extracts text from an uploaded file and splits it
//! into a `ResumeData` document with regex heuristics.
//!
//! Extraction quality is whatever `pdf-extract` gives us; the heuristics only
//! need to be good enough to pre-fill the builder form.

use bytes::Bytes;
use regex::Regex;

use crate::ats::contact::TextPatterns;
use crate::errors::AppError;
use crate::models::resume::{Education, Experience, PersonalInfo, Project, ResumeData};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const MAX_SKILL_CHARS: usize = 40;
const BULLET_MARKERS: &[char] = &['•', '-', '*', '▪', '◦', '–', '●'];
const INSTITUTION_HINTS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Pdf,
    Text,
}

fn detect_kind(bytes: &[u8], filename: &str, content_type: Option<&str>) -> Option<UploadKind> {
    let filename = filename.to_ascii_lowercase();
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();

    if bytes.starts_with(b"%PDF") || filename.ends_with(".pdf") || content_type == "application/pdf"
    {
        Some(UploadKind::Pdf)
    } else if filename.ends_with(".txt")
        || filename.ends_with(".md")
        || content_type.starts_with("text/")
    {
        Some(UploadKind::Text)
    } else {
        None
    }
}

/// Extracts plain text from an uploaded resume file.
/// PDF parsing is CPU-bound and runs on the blocking pool.
pub async fn extract_text(
    bytes: Bytes,
    filename: &str,
    content_type: Option<&str>,
) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "resume files are limited to {} MiB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let text = match detect_kind(&bytes, filename, content_type) {
        Some(UploadKind::Pdf) => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
                .map_err(|e| {
                    AppError::UnprocessableEntity(format!("could not read PDF: {e}"))
                })?
        }
        Some(UploadKind::Text) => String::from_utf8_lossy(&bytes).into_owned(),
        None => {
            return Err(AppError::Validation(
                "unsupported file type: upload a PDF or plain-text resume".to_string(),
            ))
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no text could be extracted from the file".to_string(),
        ));
    }
    Ok(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

/// Regex-based resume text splitter. Build once and share.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    patterns: TextPatterns,
    heading: Regex,
    date_range: Regex,
    single_year: Regex,
}

impl ResumeParser {
    pub fn new(patterns: TextPatterns) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns,
            heading: Regex::new(
                r"(?i)^(professional\s+summary|summary|profile|objective|about\s+me|(?:work\s+|professional\s+)?experience|employment(?:\s+history)?|education|academic\s+background|(?:technical\s+)?skills|core\s+competencies|(?:personal\s+)?projects)\s*:?$",
            )?,
            date_range: Regex::new(
                r"(?i)((?:[a-z]{3,9}\.?\s+)?\d{4})\s*(?:-|–|—|to)\s*((?:[a-z]{3,9}\.?\s+)?\d{4}|present|current|now)",
            )?,
            single_year: Regex::new(r"\b(19|20)\d{2}\b")?,
        })
    }

    pub fn patterns(&self) -> &TextPatterns {
        &self.patterns
    }

    fn classify_heading(&self, line: &str) -> Option<Section> {
        let caps = self.heading.captures(line.trim())?;
        let word = caps.get(1)?.as_str().to_ascii_lowercase();
        let section = if word.contains("experience") || word.starts_with("employment") {
            Section::Experience
        } else if word.contains("education") || word.contains("academic") {
            Section::Education
        } else if word.contains("skills") || word.contains("competencies") {
            Section::Skills
        } else if word.contains("projects") {
            Section::Projects
        } else {
            Section::Summary
        };
        Some(section)
    }

    /// Splits extracted resume text into a `ResumeData` document.
    pub fn parse(&self, text: &str) -> ResumeData {
        let mut blocks: Vec<(Section, Vec<&str>)> = vec![(Section::Header, Vec::new())];

        for raw in text.lines() {
            let line = raw.trim();
            if let Some(section) = self.classify_heading(line) {
                blocks.push((section, Vec::new()));
                continue;
            }
            if let Some((_, lines)) = blocks.last_mut() {
                lines.push(line);
            }
        }

        let mut resume = ResumeData {
            personal_info: self.parse_personal(text, &blocks[0].1),
            ..Default::default()
        };

        for (section, lines) in &blocks[1..] {
            match section {
                Section::Summary => {
                    let summary = join_words(lines);
                    if resume.summary.is_empty() {
                        resume.summary = summary;
                    } else if !summary.is_empty() {
                        resume.summary.push(' ');
                        resume.summary.push_str(&summary);
                    }
                }
                Section::Experience => resume.experience.extend(self.parse_experience(lines)),
                Section::Education => resume.education.extend(self.parse_education(lines)),
                Section::Skills => {
                    for skill in parse_skills(lines) {
                        if !resume
                            .skills
                            .iter()
                            .any(|s| s.eq_ignore_ascii_case(&skill))
                        {
                            resume.skills.push(skill);
                        }
                    }
                }
                Section::Projects => resume.projects.extend(parse_projects(lines)),
                Section::Header => {}
            }
        }

        resume
    }

    fn parse_personal(&self, text: &str, header: &[&str]) -> PersonalInfo {
        let p = &self.patterns;
        let full_name = header
            .iter()
            .take(5)
            .find(|l| looks_like_name(l))
            .map(|l| l.to_string())
            .unwrap_or_default();

        // A title line directly under the name, e.g. "Senior Backend Engineer".
        let job_title = header
            .iter()
            .skip_while(|l| **l != full_name)
            .skip(1)
            .find(|l| !l.is_empty())
            .filter(|l| looks_like_name(l) && !full_name.is_empty())
            .map(|l| l.to_string())
            .unwrap_or_default();

        PersonalInfo {
            full_name,
            job_title,
            email: p.find_email(text).unwrap_or_default().to_string(),
            phone: p.find_phone(text).unwrap_or_default().to_string(),
            linkedin: p.find_linkedin(text).unwrap_or_default().to_string(),
            website: p.find_website(text).unwrap_or_default().to_string(),
            ..Default::default()
        }
    }

    fn find_dates(&self, line: &str) -> Option<(String, String, bool)> {
        let caps = self.date_range.captures(line)?;
        let start = caps.get(1)?.as_str().trim().to_string();
        let end = caps.get(2)?.as_str().trim();
        let current = matches!(
            end.to_ascii_lowercase().as_str(),
            "present" | "current" | "now"
        );
        let end = if current { String::new() } else { end.to_string() };
        Some((start, end, current))
    }

    fn strip_dates(&self, line: &str) -> String {
        let stripped = self.date_range.replace_all(line, "");
        stripped
            .trim()
            .trim_end_matches(|c: char| c == '|' || c == ',' || c == '(' || c == ')' || c == '-')
            .trim()
            .to_string()
    }

    fn parse_experience(&self, lines: &[&str]) -> Vec<Experience> {
        paragraphs(lines)
            .into_iter()
            .filter_map(|para| {
                let (first, rest) = para.split_first()?;
                let mut exp = Experience::default();

                let mut heading_lines = vec![*first];
                // A dates-only second line belongs to the heading.
                if let Some(second) = rest.first() {
                    if self.find_dates(second).is_some() && !is_bullet(second) {
                        heading_lines.push(*second);
                    }
                }
                for line in &heading_lines {
                    if let Some((start, end, current)) = self.find_dates(line) {
                        exp.start_date = start;
                        exp.end_date = end;
                        exp.current = current;
                    }
                }

                let (title, company) = split_title_company(&self.strip_dates(first));
                exp.job_title = title;
                exp.company = company;

                let mut description = Vec::new();
                for line in &rest[heading_lines.len() - 1..] {
                    if is_bullet(line) {
                        exp.bullets.push(strip_bullet(line).to_string());
                    } else if let Some(last) = exp.bullets.last_mut() {
                        // Wrapped continuation of the previous bullet.
                        last.push(' ');
                        last.push_str(line);
                    } else {
                        description.push(*line);
                    }
                }
                exp.description = join_words(&description);
                Some(exp)
            })
            .collect()
    }

    fn parse_education(&self, lines: &[&str]) -> Vec<Education> {
        paragraphs(lines)
            .into_iter()
            .map(|para| {
                let mut edu = Education::default();
                let mut extra = Vec::new();

                for line in &para {
                    if let Some((start, end, _)) = self.find_dates(line) {
                        edu.start_date = start;
                        edu.end_date = end;
                    } else if let Some(year) = self.single_year.find(line) {
                        if edu.end_date.is_empty() {
                            edu.end_date = year.as_str().to_string();
                        }
                    }
                    let cleaned = self.strip_dates(line);
                    let cleaned = self.single_year.replace_all(&cleaned, "");
                    let cleaned = cleaned.trim().trim_end_matches([',', '|', '-']).trim();
                    if cleaned.is_empty() {
                        continue;
                    }
                    let lower = cleaned.to_ascii_lowercase();
                    if edu.institution.is_empty() && INSTITUTION_HINTS.iter().any(|h| lower.contains(h))
                    {
                        edu.institution = cleaned.to_string();
                    } else if edu.degree.is_empty() {
                        edu.degree = cleaned.to_string();
                    } else if lower.starts_with("gpa") {
                        edu.gpa = Some(cleaned.trim_start_matches(|c: char| !c.is_ascii_digit()).to_string());
                    } else {
                        extra.push(cleaned.to_string());
                    }
                }
                edu.description = extra.join(" ");
                edu
            })
            .collect()
    }
}

fn looks_like_name(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (1..=5).contains(&words)
        && !line.contains('@')
        && !line.contains('|')
        && !line.chars().any(|c| c.is_ascii_digit())
        && line.chars().any(char::is_alphabetic)
}

fn is_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(BULLET_MARKERS).trim()
}

/// Groups non-empty lines into paragraphs separated by blank lines.
fn paragraphs<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut out: Vec<Vec<&'a str>> = Vec::new();
    let mut current: Vec<&'a str> = Vec::new();
    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(*line);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn join_words(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Senior Engineer at Acme", "Senior Engineer - Acme", "Senior Engineer, Acme".
fn split_title_company(line: &str) -> (String, String) {
    for sep in [" at ", " @ ", " | ", " - ", " – ", " — ", ", "] {
        if let Some((title, company)) = line.split_once(sep) {
            return (title.trim().to_string(), company.trim().to_string());
        }
    }
    (line.trim().to_string(), String::new())
}

fn parse_skills(lines: &[&str]) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for line in lines {
        // "Languages: Rust, Go": drop the category label.
        let line = match line.split_once(':') {
            Some((label, rest)) if label.split_whitespace().count() <= 3 => rest,
            _ => *line,
        };
        for item in line.split([',', '•', '|', ';', '·']) {
            let item = strip_bullet(item.trim());
            if item.is_empty() || item.chars().count() > MAX_SKILL_CHARS {
                continue;
            }
            if !skills.iter().any(|s| s.eq_ignore_ascii_case(item)) {
                skills.push(item.to_string());
            }
        }
    }
    skills
}

fn parse_projects(lines: &[&str]) -> Vec<Project> {
    paragraphs(lines)
        .into_iter()
        .filter_map(|para| {
            let (first, rest) = para.split_first()?;
            let mut project = Project {
                name: strip_bullet(first).to_string(),
                ..Default::default()
            };
            let mut description = Vec::new();
            for line in rest {
                let lower = line.to_ascii_lowercase();
                let tech = ["technologies:", "tech stack:", "tech:", "built with:"]
                    .iter()
                    .find(|label| lower.starts_with(*label));
                if let Some(label) = tech {
                    project.technologies = line[label.len()..]
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                } else if line.starts_with("http") || line.starts_with("github.com") {
                    project.link = line.to_string();
                } else {
                    description.push(strip_bullet(line));
                }
            }
            project.description = join_words(&description);
            Some(project)
        })
        .collect()
}
