// Travel output schema and its validator
//
// The orchestrator's final answer arrives as model text. It is parsed as JSON
// (a markdown code fence or surrounding prose is tolerated) and checked for the
// five required fields. Every missing or blank field is reported at once so a
// single correction round can fix all of them.

use crate::error::{Result, TripbotError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Field names in schema order
pub const TRAVEL_OUTPUT_FIELDS: [&str; 5] = ["destination", "duration", "summary", "cost", "tips"];

/// Final answer of a planning cycle
///
/// Every field is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelOutput {
    pub destination: String,
    pub duration: String,
    /// Itinerary narrative
    pub summary: String,
    /// Cost breakdown
    pub cost: String,
    /// Local recommendations, etiquette, caveats
    pub tips: String,
}

impl TravelOutput {
    fn field(&self, name: &str) -> &str {
        match name {
            "destination" => &self.destination,
            "duration" => &self.duration,
            "summary" => &self.summary,
            "cost" => &self.cost,
            _ => &self.tips,
        }
    }

    /// Re-check an already built value (e.g. one constructed by hand)
    pub fn check(&self) -> Result<()> {
        let empty: Vec<&str> = TRAVEL_OUTPUT_FIELDS
            .iter()
            .copied()
            .filter(|f| self.field(f).trim().is_empty())
            .collect();

        if empty.is_empty() {
            Ok(())
        } else {
            Err(TripbotError::validation(empty))
        }
    }
}

/// Render a scalar as text; objects, arrays and nulls do not count as values
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Validate a JSON candidate against the travel output schema
///
/// # Errors
/// - `ValidationError` naming every missing, empty or non-scalar field
pub fn validate(candidate: &Value) -> Result<TravelOutput> {
    let Some(object) = candidate.as_object() else {
        return Err(TripbotError::validation(TRAVEL_OUTPUT_FIELDS));
    };

    let mut values = Vec::with_capacity(TRAVEL_OUTPUT_FIELDS.len());
    let mut missing = Vec::new();

    for field in TRAVEL_OUTPUT_FIELDS {
        match object.get(field).and_then(scalar_text) {
            Some(text) if !text.is_empty() => values.push(text),
            _ => missing.push(field),
        }
    }

    if !missing.is_empty() {
        return Err(TripbotError::validation(missing));
    }

    let mut values = values.into_iter();
    let mut next = || values.next().unwrap_or_default();
    Ok(TravelOutput {
        destination: next(),
        duration: next(),
        summary: next(),
        cost: next(),
        tips: next(),
    })
}

fn fence_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(\{.*?\})\s*```").ok())
        .as_ref()
}

/// Pull the JSON object out of model text
fn extract_json(text: &str) -> Option<&str> {
    if let Some(pattern) = fence_pattern() {
        if let Some(body) = pattern.captures(text).and_then(|c| c.get(1)) {
            return Some(body.as_str());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse and validate a textual candidate
///
/// Text that holds no parseable JSON object fails naming all five fields.
pub fn parse_candidate(text: &str) -> Result<TravelOutput> {
    let parsed = extract_json(text).and_then(|json| serde_json::from_str::<Value>(json).ok());

    match parsed {
        Some(value) => validate(&value),
        None => {
            tracing::debug!("Candidate is not JSON: {:.80}", text);
            Err(TripbotError::validation(TRAVEL_OUTPUT_FIELDS))
        }
    }
}
