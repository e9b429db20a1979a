// Experience LLM prompt template.

use chrono::NaiveDate;

/// Resume text beyond this many characters is cut off before it reaches the prompt.
pub const MAX_PROMPT_CHARS: usize = 12_000;

pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Return ONLY JSON: { "total_years": <float> }.

Compute TOTAL professional work experience:
- Merge overlapping roles so no period is counted twice.
- Convert months into decimal years (1 decimal).
- Treat "present" or "current" as {today}.
- If unsure, return 0.0
- DO NOT output anything except the JSON object.

Resume:
"""{resume_text}""""#;

/// Builds the years-of-experience prompt for `text` as of `today`.
pub fn build_experience_prompt(text: &str, today: NaiveDate) -> String {
    EXPERIENCE_PROMPT_TEMPLATE
        .replace("{today}", &today.format("%Y-%m-%d").to_string())
        .replace("{resume_text}", truncate_chars(text, MAX_PROMPT_CHARS))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
