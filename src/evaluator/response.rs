// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Strict parsing of model evaluation responses
//!
//! The model output is untrusted. This is the trust boundary: anything
//! that does not parse into the expected DISCERN shape is converted into
//! a typed error here and never propagates further into the system.

use serde::Deserialize;
use serde_json::Value;

use crate::discern::{DiscernResult, DiscernScoreItem};

use super::error::EvaluationError;
use super::strategy::EvaluationRequest;

#[derive(Debug, Deserialize)]
struct RawScoreItem {
    #[serde(rename = "criteriaId")]
    criteria_id: i64,
    score: i64,
    #[serde(default)]
    justification: Option<String>,
}

/// Parse raw model text into a normalized `DiscernResult`
///
/// Extraction is lenient about surrounding prose (the outermost JSON
/// object is located by brace window) but strict about the payload:
/// a missing or non-positive `totalScore`, or a `scores` field that is
/// not a list, is a `SchemaViolation`. Missing `type` is coalesced from
/// the source classification, missing `observations` to empty.
pub fn parse_evaluation(
    raw: &str,
    request: &EvaluationRequest,
) -> Result<DiscernResult, EvaluationError> {
    let payload = extract_json_object(raw).ok_or(EvaluationError::MalformedResponse)?;

    let value: Value =
        serde_json::from_str(payload).map_err(|_| EvaluationError::MalformedResponse)?;

    // The evaluator boundary may answer with an error object instead of
    // the score payload
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(EvaluationError::SchemaViolation(format!(
            "evaluator returned error: {}",
            message
        )));
    }

    let total_score = value
        .get("totalScore")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            EvaluationError::SchemaViolation("totalScore is missing or not a number".to_string())
        })?;
    if total_score <= 0 {
        return Err(EvaluationError::SchemaViolation(format!(
            "totalScore must be positive, got {}",
            total_score
        )));
    }

    let scores_value = value
        .get("scores")
        .cloned()
        .ok_or_else(|| EvaluationError::SchemaViolation("scores is missing".to_string()))?;
    if !scores_value.is_array() {
        return Err(EvaluationError::SchemaViolation(
            "scores is not a list".to_string(),
        ));
    }

    let raw_scores: Vec<RawScoreItem> = serde_json::from_value(scores_value)
        .map_err(|e| EvaluationError::SchemaViolation(format!("scores entry invalid: {}", e)))?;

    let mut scores = Vec::with_capacity(raw_scores.len());
    for item in raw_scores {
        let criteria_id = u8::try_from(item.criteria_id).map_err(|_| {
            EvaluationError::SchemaViolation(format!(
                "criteriaId {} out of range",
                item.criteria_id
            ))
        })?;
        let score = u8::try_from(item.score).map_err(|_| {
            EvaluationError::SchemaViolation(format!(
                "score {} for criterion {} out of range",
                item.score, criteria_id
            ))
        })?;
        scores.push(DiscernScoreItem {
            criteria_id,
            score,
            justification: item.justification.unwrap_or_default(),
        });
    }

    let content_type = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| default_content_type(request.is_video).to_string());

    let observations = value
        .get("observations")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(DiscernResult {
        url: request.url.clone(),
        title: request.title.clone(),
        content_type,
        total_score: total_score as u32,
        scores,
        observations,
    })
}

/// Default content classification when the model omits one
fn default_content_type(is_video: bool) -> &'static str {
    if is_video {
        "VIDEO"
    } else {
        "HTML"
    }
}

/// Locate the outermost JSON object in free-form model text
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
