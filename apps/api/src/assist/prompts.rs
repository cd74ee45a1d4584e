// Prompt constants for the AI-assist endpoints.
// Placeholders are replaced with clipped user input before sending.

/// Professional-summary writer. Plain text out.
pub const SUMMARY_SYSTEM: &str = "You are a professional resume writer. \
    Write concise, specific, first-person-implied resume summaries. \
    Respond with the summary text only, no headings, no quotes.";

/// Replace `{resume_text}` and `{job_description}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a professional summary of 2-3 sentences (under 70 words) for this resume.
If a job description is given, emphasise the experience most relevant to it.

RESUME:
{resume_text}

JOB DESCRIPTION (may be empty):
{job_description}
"#;

pub const BULLETS_SYSTEM: &str = "You are a professional resume writer \
    who turns duty descriptions into achievement bullets.";

/// Replace `{job_title}`, `{company}`, `{description}`.
pub const BULLETS_PROMPT_TEMPLATE: &str = r#"Rewrite this role description as 3 to 5 resume bullet points.

ROLE: {job_title}
COMPANY: {company}
DESCRIPTION:
{description}

Rules:
- Start every bullet with a strong action verb (Built, Led, Reduced, Launched).
- Include a number, percentage, amount or time wherever the description supports one.
- One line each, no trailing period, no bullet symbols.

Return a JSON object with this EXACT schema:
{"bullets": ["...", "..."]}
"#;

pub const SKILLS_SYSTEM: &str = "You are a technical recruiter \
    who knows which skills hiring managers screen for.";

/// Replace `{job_title}` and `{job_description}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Suggest 8 to 12 skills a candidate for this role should list on a resume.
Prefer concrete tools and technologies over generic traits. Use the canonical spelling (e.g. "PostgreSQL", "Kubernetes").

ROLE: {job_title}
JOB DESCRIPTION (may be empty):
{job_description}

Return a JSON object with this EXACT schema:
{"skills": ["...", "..."]}
"#;

pub const TAILOR_SYSTEM: &str = "You are a career coach who tailors resumes \
    to a specific job posting without misrepresenting the candidate.";

/// Replace `{resume_text}`, `{job_description}`, `{missing_keywords}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Suggest specific edits that would make this resume a better match for the job.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}

KEYWORDS FROM THE JOB DESCRIPTION MISSING FROM THE RESUME:
{missing_keywords}

Give 4 to 8 suggestions. Each must name the resume section to change and what to write.
Only suggest adding a missing keyword when the resume gives evidence the candidate has that skill.

Return a JSON object with this EXACT schema:
{"suggestions": ["...", "..."]}
"#;
