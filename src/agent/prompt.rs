/// Build the single instruction block sent alongside the screenshot.
///
/// The goal is embedded verbatim and the normalized hierarchy is appended
/// verbatim as the last section, so element identifiers the model quotes
/// back come straight from the dump.
pub fn build_prompt(goal: &str, hierarchy: &str) -> String {
    format!(
r#"You are a UI test agent driving a mobile application one step at a time.
GOAL: {goal}

INSTRUCTIONS:
1. VISUAL CHECK: Inspect the screenshot closely. Is any text truncated (cut off, ellipsized, clipped)?
2. HIERARCHY CHECK: Review the UI elements listed below.
3. DECISION: Choose the single next action that moves toward the goal.

Respond with exactly one JSON object and nothing else (no prose, no markdown fences):
{{
  "hasTruncatedText": true or false,
  "visualDescription": "where the truncated text is, or null",
  "type": "tap" | "type" | "done" | "fail",
  "elementID": "identifier copied from the hierarchy, or null",
  "text": "text to type, or null",
  "reasoning": "why this action was chosen"
}}

Use "tap" with elementID to press an element, "type" with text to enter text into the focused field,
"done" when the goal is achieved, and "fail" when the goal cannot be reached.

UI HIERARCHY:
{hierarchy}"#
    )
}
