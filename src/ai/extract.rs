//! Extraction of the generated text from a Gemini response body.

use serde_json::Value;

/// Navigate `candidates[0].content.parts[0].text` in the raw response body.
///
/// Returns `None` if the body is not valid JSON or any key along the chain
/// is absent or of the wrong type. There is no partial-extraction fallback.
pub fn extract_generated_text(raw: &str) -> Option<String> {
    let body: Value = serde_json::from_str(raw).ok()?;

    body.get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .first()?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}
