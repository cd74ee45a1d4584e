// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every generation prompt so the model does not invent history.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the resume content provided. \
    Do NOT invent employers, dates, degrees, metrics or technologies. \
    If a number is not given, describe the outcome without one.";

/// Upper bound on any single user-supplied text spliced into a prompt.
pub const MAX_PROMPT_CHARS: usize = 8000;

/// Truncates prompt input on a char boundary.
pub fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills `{name}` placeholders in one pass over the template.
/// Substituted values are never scanned again, so user text that happens to
/// contain `{resume_text}` stays literal. Unknown braces are copied as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
