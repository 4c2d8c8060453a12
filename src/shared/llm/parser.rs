use lazy_static::lazy_static;
use regex::Regex;

use super::LlmResponse;

lazy_static! {
    /// Fenced block, with or without a language tag
    static ref CODE_FENCE_RE: Regex = Regex::new(r"(?s)```[a-zA-Z]*\s*\n?(.*?)```").unwrap();

    /// Trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();
}

/// Pull the JSON object out of a model reply.
///
/// Fenced blocks win; otherwise the outermost `{ ... }` span is taken.
fn extract_json_object(text: &str) -> Result<&str, String> {
    if let Some(inner) = CODE_FENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return Ok(inner);
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    Ok(&text[start..=end])
}

fn strip_trailing_commas(json: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json, "$1").into_owned()
}

/// Last resort: let llm_json rebuild broken JSON. Guarded against panics.
fn repair(json: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json, &options)
    })) {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

fn try_parse<T: LlmResponse>(text: &str) -> Result<T, String> {
    let json = extract_json_object(text)?;

    if let Ok(parsed) = serde_json::from_str::<T>(json) {
        return Ok(parsed);
    }

    let without_commas = strip_trailing_commas(json);
    if let Ok(parsed) = serde_json::from_str::<T>(&without_commas) {
        tracing::debug!("Model JSON parsed after trailing comma fix");
        return Ok(parsed);
    }

    if let Some(parsed) = repair(json).and_then(|r| serde_json::from_str::<T>(&r).ok()) {
        tracing::debug!("Model JSON parsed after llm_json repair");
        return Ok(parsed);
    }

    Err(format!(
        "Unparseable model JSON: {}",
        json.chars().take(200).collect::<String>()
    ))
}

/// Parse a model reply, returning `T::default()` marked as fallback on failure
pub fn parse_with_fallback<T: LlmResponse>(text: &str) -> T {
    try_parse::<T>(text).unwrap_or_else(|error| {
        tracing::warn!("Model response parsing failed, using fallback: {}", error);
        let mut fallback = T::default();
        fallback.mark_as_fallback(error);
        fallback
    })
}
