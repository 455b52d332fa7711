// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line interface

pub mod analyze;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// DISCERN health-information analyzer CLI
#[derive(Parser, Debug)]
#[command(name = "discern-node")]
#[command(version)]
#[command(about = "Search health content and score it with the DISCERN instrument", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for a keyword and print the ranked results
    Search(analyze::SearchArgs),

    /// Search for a keyword and run the full DISCERN analysis
    Analyze(analyze::AnalyzeArgs),

    /// Print the 15 DISCERN criteria
    Criteria,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search(args) => analyze::run_search(args).await,
        Commands::Analyze(args) => analyze::run_analysis(args).await,
        Commands::Criteria => {
            analyze::print_criteria();
            Ok(())
        }
    }
}
