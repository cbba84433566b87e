// Shared prompt fragments.
// Each generation module keeps its own templates in generation/prompts.rs;
// this file only holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

/// Common instruction appended to every generation prompt.
pub const LANGUAGE_INSTRUCTION: &str = "\
    Write all generated text in Simplified Chinese unless the input is clearly in another language. \
    Keep field names exactly as given in the schema.";

/// Builds a system prompt from a role description plus the JSON-only rule.
pub fn system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}
