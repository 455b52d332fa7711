// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Delimited tabular export
//!
//! One row per analyzed result: url/title/type/total, then a score and
//! justification column pair per criterion, then observations. Standard
//! CSV quoting: any field containing a delimiter, quote, or newline is
//! wrapped in quotes with internal quotes doubled. The corpus contract is
//! exact, so both the writer and a matching line parser live here; the
//! parser doubles as the round-trip check for the quoting rule.

use crate::discern::{DiscernResult, CRITERIA_COUNT};

/// Quote a field when it contains a delimiter, quote, or newline
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Header row matching [`result_row`]
pub fn header_row() -> String {
    let mut columns = vec![
        "URL".to_string(),
        "Title".to_string(),
        "Type".to_string(),
        "Total Score".to_string(),
    ];
    for id in 1..=CRITERIA_COUNT {
        columns.push(format!("C{} Score", id));
        columns.push(format!("C{} Justification", id));
    }
    columns.push("Observations".to_string());
    columns.join(",")
}

/// Serialize one result as a CSV row
///
/// Scores are emitted in criterion-id order regardless of their order in
/// the result; a validated result always covers ids 1..=15.
pub fn result_row(result: &DiscernResult) -> String {
    let mut columns = vec![
        escape_field(&result.url),
        escape_field(&result.title),
        escape_field(&result.content_type),
        result.total_score.to_string(),
    ];

    for id in 1..=CRITERIA_COUNT as u8 {
        match result.scores.iter().find(|s| s.criteria_id == id) {
            Some(item) => {
                columns.push(item.score.to_string());
                columns.push(escape_field(&item.justification));
            }
            None => {
                columns.push(String::new());
                columns.push(String::new());
            }
        }
    }

    columns.push(escape_field(&result.observations));
    columns.join(",")
}

/// Serialize a result set as a complete CSV document
pub fn results_to_csv(results: &[DiscernResult]) -> String {
    let mut lines = vec![header_row()];
    lines.extend(results.iter().map(result_row));
    lines.join("\r\n") + "\r\n"
}

/// Parse one CSV line back into fields (standard unquoting)
///
/// Inverse of the quoting rule above; used by round-trip tests and by
/// consumers that read exported files back.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => {
                    fields.push(std::mem::take(&mut field));
                }
                _ => field.push(c),
            }
        }
    }

    fields.push(field);
    fields
}
