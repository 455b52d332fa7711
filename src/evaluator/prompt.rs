// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt construction for rubric evaluation
//!
//! The system framing and user payload are fixed; only the url/title/
//! content vary per request. The output-schema instruction pins the JSON
//! shape the response parser expects.

use crate::discern::DISCERN_CRITERIA;

use super::strategy::EvaluationRequest;

/// Fixed system framing for every evaluation call
pub const SYSTEM_PROMPT: &str = "You are a health-information reviewer trained in the DISCERN \
instrument for judging the quality and reliability of consumer health information. You score \
written and transcribed health content against the 15 DISCERN criteria, always justifying each \
score, and you respond with JSON only.";

/// Render the 15 criteria as a numbered rubric block
pub fn rubric_block() -> String {
    DISCERN_CRITERIA
        .iter()
        .map(|c| format!("{}. {} {}", c.id, c.question, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the user payload for one evaluation request
pub fn build_user_prompt(request: &EvaluationRequest) -> String {
    format!(
        "Analyze the following health content using the DISCERN instrument.\n\
        \n\
        URL: {url}\n\
        Title: {title}\n\
        \n\
        CONTENT:\n\
        {content}\n\
        \n\
        DISCERN criteria:\n\
        {rubric}\n\
        \n\
        Score every criterion from 1 (no) to 5 (yes) with a justification, then return a JSON \
        object with exactly this shape:\n\
        {{\n\
          \"type\": \"HTML | PDF | VIDEO\",\n\
          \"totalScore\": <sum of the 15 scores>,\n\
          \"scores\": [{{\"criteriaId\": 1, \"score\": 1-5, \"justification\": \"...\"}}, ... 15 entries],\n\
          \"observations\": \"overall remarks about the analyzed content\"\n\
        }}\n\
        \n\
        IMPORTANT: return ONLY the JSON object, with no additional explanation.",
        url = request.url,
        title = request.title,
        content = request.content,
        rubric = rubric_block(),
    )
}
