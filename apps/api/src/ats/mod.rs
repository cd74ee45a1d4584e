//! ATS scoring: how well a resume's text matches a job description, plus a
//! job-independent completeness score for structured documents.

pub mod bullets;
pub mod completeness;
pub mod contact;
pub mod handlers;
pub mod keywords;
pub mod normalize;
pub mod prompts;
pub mod scorer;
