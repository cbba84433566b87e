// All LLM prompt templates for the generation endpoints.
// Placeholders in `{braces}` are replaced verbatim with caller data; nothing is escaped.

/// Role for student diagnosis.
pub const DIAGNOSIS_ROLE: &str = "You are an experienced sales-training coach who diagnoses \
    learners from their skill radar and practice history.";

/// Replace: {student_name}, {radar_json}, {history_json}, {language_instruction}
pub const DIAGNOSIS_PROMPT_TEMPLATE: &str = r#"Produce a learning diagnosis for the student "{student_name}".

SKILL RADAR (dimension scores, 0 to fullMark):
{radar_json}

RECENT PRACTICE HISTORY:
{history_json}

Return a JSON object with this EXACT schema:
{
  "overallLevel": "beginner" | "intermediate" | "advanced",
  "summary": "two or three sentences on the student's current state",
  "strengths": ["string"],
  "weaknesses": ["string"],
  "dimensionAnalysis": [
    {"dimension": "string", "score": 0, "comment": "string"}
  ],
  "recommendations": ["concrete next step"],
  "suggestedScenarios": ["practice scenario name"]
}

RULES:
1. Base every statement on the data above. If a list is empty, say the data is insufficient.
2. dimensionAnalysis has one entry per radar dimension.
3. {language_instruction}"#;

/// Role for courseware generation.
pub const COURSEWARE_ROLE: &str = "You are an instructional designer who turns corporate \
    knowledge documents into a structured training course.";

/// Replace: {title}, {description}, {documents_json}, {language_instruction}
pub const COURSEWARE_PROMPT_TEMPLATE: &str = r#"Design the courseware "{title}".

COURSE DESCRIPTION:
{description}

SOURCE DOCUMENTS (summaries and key points):
{documents_json}

Return a JSON object with this EXACT schema:
{
  "outline": [
    {"title": "section title", "duration": "15 minutes", "keyPoints": ["string"]}
  ],
  "scripts": {
    "section title": "narration script for that section"
  }
}

RULES:
1. Between 3 and 8 outline sections, ordered for teaching.
2. Every outline section title has exactly one entry in "scripts".
3. Use only facts found in the source documents.
4. {language_instruction}"#;

/// Role for document parsing.
pub const DOCUMENT_ROLE: &str = "You are a knowledge-base analyst who summarizes internal \
    training documents.";

/// Replace: {file_name}, {file_url}, {content}, {language_instruction}
pub const DOCUMENT_PROMPT_TEMPLATE: &str = r#"Summarize the training document "{file_name}".

FILE URL: {file_url}

DOCUMENT CONTENT:
{content}

Return a JSON object with this EXACT schema:
{
  "summary": "a concise paragraph describing what the document teaches",
  "keyPoints": ["string"]
}

RULES:
1. Between 3 and 8 key points.
2. If the content is unavailable, infer carefully from the file name and say so in the summary.
3. {language_instruction}"#;

/// Stands in for document text when it could not be loaded.
pub const DOCUMENT_CONTENT_UNAVAILABLE: &str = "(content unavailable)";

/// Role for practice-script generation.
pub const PRACTICE_SCRIPT_ROLE: &str = "You are a scenario writer for role-play sales practice \
    between a learner and an AI customer character.";

/// Replace: {prompt}, {practice_mode}, {difficulty}, {language_instruction}
pub const PRACTICE_SCRIPT_PROMPT_TEMPLATE: &str = r#"Write a practice script.

REQUEST:
{prompt}

PRACTICE MODE: {practice_mode}
DIFFICULTY: {difficulty}

Return a JSON object with this EXACT schema:
{
  "title": "string",
  "scenario": "the situation the learner is placed in",
  "character": {"name": "string", "role": "string", "personality": "string"},
  "dialogues": [
    {"speaker": "character" | "learner", "content": "string", "hint": "coaching hint or empty string"}
  ],
  "evaluationCriteria": ["string"]
}

RULES:
1. Between 6 and 12 dialogue turns, starting with the character.
2. Hints appear only on learner turns.
3. {language_instruction}"#;

/// Role for training-plan generation.
pub const TRAINING_PLAN_ROLE: &str = "You are a corporate learning-and-development planner.";

/// Replace: {prompt}, {target_audience}, {training_goals}, {language_instruction}
pub const TRAINING_PLAN_PROMPT_TEMPLATE: &str = r#"Create a training plan.

REQUEST:
{prompt}

TARGET AUDIENCE: {target_audience}
TRAINING GOALS: {training_goals}

Return a JSON object with this EXACT schema:
{
  "title": "string",
  "description": "string",
  "duration": "overall duration, e.g. 4 weeks",
  "stages": [
    {"name": "string", "duration": "string", "objectives": ["string"], "activities": ["string"]}
  ],
  "assessment": "how completion is measured"
}

RULES:
1. Between 3 and 6 stages, each building on the previous one.
2. {language_instruction}"#;

/// Placeholder for optional fields the caller left out.
pub const NOT_SPECIFIED: &str = "not specified";

/// Substitutes `{key}` placeholders in one pass over the template.
///
/// Substituted values are never rescanned, so caller text containing a
/// placeholder name is kept literally. Braces that do not name a known key
/// (the JSON schemas above) pass through untouched.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(*key)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
