// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result export
//!
//! Client-side serialization of completed analyses: a delimited tabular
//! file (one row per result, one score/justification column pair per
//! criterion) and a human-readable text report. Pure functions; callers
//! decide where the bytes go.

pub mod csv;
pub mod report;

pub use csv::{escape_field, parse_csv_line, results_to_csv};
pub use report::render_report;
