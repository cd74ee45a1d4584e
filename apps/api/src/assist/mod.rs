//! AI-assist: summary, bullet, skill and tailoring suggestions from the LLM.
//! Output is advisory; nothing here writes to the stored resume.

pub mod handlers;
pub mod prompts;
