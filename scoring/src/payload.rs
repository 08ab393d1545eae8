use crate::MatchScore;
use crate::error::{Result, ScoringError};
use serde_json::{Map, Value};

/// Pull the JSON object out of a model reply.
///
/// Replies are often wrapped in a markdown code fence. A ```` ```json ````
/// fence wins over a bare ```` ``` ```` one. Anything that still fails to
/// parse after trimming stray backticks yields an empty object.
pub fn extract_json_payload(raw: &str) -> Value {
    let body = if let Some((_, rest)) = raw.split_once("```json") {
        rest.split_once("```").map_or(rest, |(inner, _)| inner).trim()
    } else if let Some((_, rest)) = raw.split_once("```") {
        rest.trim()
    } else {
        raw
    };

    serde_json::from_str(body)
        .or_else(|_| {
            let stripped = body.trim_matches(|c: char| matches!(c, '`' | ' ' | '\n'));
            serde_json::from_str(stripped)
        })
        .unwrap_or_else(|_| Value::Object(Map::new()))
}

impl MatchScore {
    /// Build a score from a parsed payload.
    ///
    /// The score is clamped to `[0, 1]`; a missing score counts as 0. A score
    /// that is neither a number nor a numeric string is rejected.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let score = match payload.get("score") {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| ScoringError::Payload(format!("score {n} is not a float")))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| ScoringError::Payload(format!("score {s:?}: {e}")))?,
            Some(other) => {
                return Err(ScoringError::Payload(format!(
                    "score must be a number, got {other}"
                )));
            }
        };
        if score.is_nan() {
            return Err(ScoringError::Payload("score is NaN".to_string()));
        }

        let explanation = text_field(payload, "explanation");
        Ok(Self {
            score: score.clamp(0.0, 1.0),
            explanation: if explanation.is_empty() {
                "No explanation".to_string()
            } else {
                explanation
            },
            explanation_short: text_field(payload, "explanation_short"),
            recommend: payload
                .get("recommend")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

fn text_field(payload: &Value, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
