// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Export round-trip tests
//!
//! Writes an exported CSV to disk and reads it back through the standard
//! unquoting rules, checking that delimiter- and quote-bearing fields
//! survive the trip exactly.

use discern_node::discern::{DiscernResult, DiscernScoreItem};
use discern_node::export::{parse_csv_line, results_to_csv};

fn result_with_tricky_fields() -> DiscernResult {
    let scores: Vec<DiscernScoreItem> = (1..=15)
        .map(|id| DiscernScoreItem {
            criteria_id: id,
            score: 3,
            justification: if id == 7 {
                // Delimiter and embedded quotes in one field
                "Cites \"supporting\" sources, but only two".to_string()
            } else {
                format!("Criterion {} partially addressed", id)
            },
        })
        .collect();
    DiscernResult {
        url: "https://example.org/health?q=1,2".to_string(),
        title: "The \"definitive\" guide, 2nd edition".to_string(),
        content_type: "HTML".to_string(),
        total_score: 45,
        scores,
        observations: "Good overall, with caveats".to_string(),
    }
}

#[test]
fn test_csv_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");

    let original = result_with_tricky_fields();
    std::fs::write(&path, results_to_csv(std::slice::from_ref(&original))).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.trim_end().split("\r\n").collect();
    assert_eq!(lines.len(), 2); // header + one record

    let fields = parse_csv_line(lines[1]);
    assert_eq!(fields[0], original.url);
    assert_eq!(fields[1], original.title);
    assert_eq!(fields[3], "45");

    // Criterion 7 justification sits in the C7 justification column:
    // 4 fixed columns, then (score, justification) pairs per criterion
    let c7_justification = &fields[4 + 6 * 2 + 1];
    assert_eq!(c7_justification, "Cites \"supporting\" sources, but only two");

    let observations = fields.last().unwrap();
    assert_eq!(observations, "Good overall, with caveats");
}

#[test]
fn test_csv_parser_matches_writer_for_every_field() {
    let original = result_with_tricky_fields();
    let csv = results_to_csv(&[original.clone()]);
    let record = csv.trim_end().split("\r\n").nth(1).unwrap();
    let fields = parse_csv_line(record);

    for (index, item) in original.scores.iter().enumerate() {
        assert_eq!(fields[4 + index * 2], item.score.to_string());
        assert_eq!(fields[4 + index * 2 + 1], item.justification);
    }
}
