use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::models::Itinerary;

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)```(?:json)?\s*").expect("fence pattern is valid"))
}

fn object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("object pattern is valid"))
}

/// Pulls a JSON value out of a model reply that may be fenced in Markdown or
/// wrapped in prose.
///
/// Stage one strips the fences and parses the rest; stage two parses the span
/// from the first `{` to the last `}`. `None` when neither parses.
pub fn extract_json(text: &str) -> Option<Value> {
    let stripped = fence_pattern().replace_all(text, "");
    let stripped = stripped.trim();

    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Some(value);
    }

    let span = object_pattern().find(stripped)?;
    serde_json::from_str(span.as_str()).ok()
}

/// Accepts only an object with a non-empty `days` array that fits [`Itinerary`].
pub fn parse_itinerary(text: &str) -> Option<Itinerary> {
    let value = extract_json(text)?;
    let has_days = value
        .get("days")
        .and_then(Value::as_array)
        .is_some_and(|days| !days.is_empty());
    if !has_days {
        return None;
    }

    match serde_json::from_value::<Itinerary>(value) {
        Ok(itinerary) => Some(itinerary),
        Err(e) => {
            tracing::debug!("Model JSON does not fit the itinerary schema: {e}");
            None
        }
    }
}
