//! Decoding of analyzer output into [`AnalysisReport`].
//!
//! Nothing here touches the network, so every malformed shape the service
//! has been seen to return is covered by plain unit tests.

use serde::Deserialize;
use serde_json::{json, Value};
use zonewatch_core::error::AnalysisError;
use zonewatch_core::model::AnalysisReport;

/// Response schema sent with every request so the service answers with a
/// bare JSON object matching [`AnalysisReport`].
pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "peopleCount": { "type": "INTEGER" },
            "vehicleCount": { "type": "INTEGER" },
            "density": {
                "type": "STRING",
                "enum": ["Low", "Medium", "High", "Critical"]
            },
            "flow": {
                "type": "STRING",
                "enum": ["Smooth", "Moderate", "Congested", "Stalled"]
            },
            "riskScore": { "type": "INTEGER" },
            "summary": { "type": "STRING" },
            "prediction": { "type": "STRING" }
        },
        "required": [
            "peopleCount", "vehicleCount", "density", "flow",
            "riskScore", "summary", "prediction"
        ],
        "propertyOrdering": [
            "peopleCount", "vehicleCount", "density", "flow",
            "riskScore", "summary", "prediction"
        ]
    })
}

/// Parses the structured text the model produced.
///
/// Value ranges are not checked here; that happens when the report is
/// accepted into history.
pub fn decode_report(text: &str) -> Result<AnalysisReport, AnalysisError> {
    let text = strip_code_fence(text.trim());
    serde_json::from_str(text).map_err(|e| AnalysisError::Malformed(e.to_string()))
}

// Some models wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pulls the text of the first candidate out of a `generateContent` body.
pub fn candidate_text(body: &str) -> Result<String, AnalysisError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Malformed(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AnalysisError::Malformed(
            "response contained no candidate text".into(),
        ));
    }
    Ok(text)
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Human-readable message for a non-2xx response.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".into(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}
