// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search and analysis commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::content::WebContentExtractor;
use crate::discern::{quality_label, DISCERN_CRITERIA};
use crate::evaluator::ModelEvaluator;
use crate::export::{render_report, results_to_csv};
use crate::pipeline::{AnalysisPipeline, PipelineEvent, UrlStage};
use crate::search::SearchService;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Health-related keyword to search for
    pub keyword: String,

    /// Number of results to request
    #[arg(short, long, default_value_t = 10)]
    pub quantity: usize,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Health-related keyword to search for
    pub keyword: String,

    /// Number of results to request and analyze
    #[arg(short, long, default_value_t = 10)]
    pub quantity: usize,

    /// Write the results as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write a text report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Search-only command
pub async fn run_search(args: SearchArgs) -> Result<()> {
    let config = AppConfig::from_env();
    let service = SearchService::new(config.search);

    let outcome = service
        .search(&args.keyword, Some(args.quantity))
        .await
        .context("search failed")?;

    if outcome.metadata.returned < outcome.metadata.requested {
        println!("Note: {}", outcome.metadata.message);
    }

    for item in &outcome.results {
        println!("{:>2}. {}", item.ranking, item.title);
        println!("    {}", item.url);
        if !item.snippet.is_empty() {
            println!("    {}", item.snippet);
        }
    }

    Ok(())
}

/// Full search-and-analyze command
pub async fn run_analysis(args: AnalyzeArgs) -> Result<()> {
    let config = AppConfig::from_env();
    config.validate().context("configuration invalid")?;

    let service = SearchService::new(config.search.clone());
    let outcome = service
        .search(&args.keyword, Some(args.quantity))
        .await
        .context("search failed")?;

    println!(
        "Found {} results for \"{}\"",
        outcome.metadata.returned, args.keyword
    );
    if outcome.metadata.returned < outcome.metadata.requested {
        println!("Note: {}", outcome.metadata.message);
    }

    let extractor = Arc::new(WebContentExtractor::new(config.content.clone()));
    let evaluator = Arc::new(ModelEvaluator::new(config.evaluator.clone()));

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let pipeline = AnalysisPipeline::new(extractor, evaluator, config.pipeline.clone())
        .with_events(events_tx);

    // Ctrl-C stops the run between URLs; the in-flight URL finishes first
    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            eprintln!("Cancellation requested, finishing the current URL...");
            cancel.cancel();
        }
    });

    let progress = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            render_event(&event);
        }
    });

    let report = pipeline.run(&outcome.results).await?;
    drop(pipeline); // closes the event channel so the progress task ends
    let _ = progress.await;

    println!();
    println!("Analyzed {} URLs successfully:", report.results.len());
    for result in &report.results {
        println!(
            "  {:>2}/75 ({:<14}) {}",
            result.total_score,
            quality_label(result.total_score),
            result.url
        );
    }

    if !report.failures.is_empty() {
        println!();
        println!("{} URLs failed:", report.failures.len());
        for failure in &report.failures {
            println!("  {} - {}: {}", failure.url, failure.kind, failure.message);
        }
    }

    if let Some(path) = args.csv {
        std::fs::write(&path, results_to_csv(&report.results))
            .with_context(|| format!("writing CSV to {}", path.display()))?;
        println!("CSV written to {}", path.display());
    }

    if let Some(path) = args.report {
        std::fs::write(&path, render_report(&report.results, &report.failures))
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Print the static criteria catalog
pub fn print_criteria() {
    for criterion in &DISCERN_CRITERIA {
        println!(
            "{:>2}. [{}] {}",
            criterion.id,
            criterion.category.label(),
            criterion.question
        );
        println!("    {}", criterion.description);
    }
}

fn render_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::StageChanged {
            index,
            total,
            url,
            stage,
        } => match stage {
            UrlStage::Extracting => {
                println!("[{}/{}] Extracting {}", index + 1, total, url);
            }
            UrlStage::Evaluating => {
                println!("[{}/{}] Evaluating {}", index + 1, total, url);
            }
            _ => {}
        },
        PipelineEvent::ResultAccepted {
            url, total_score, ..
        } => {
            println!("  -> accepted ({}/75): {}", total_score, url);
        }
        PipelineEvent::UrlRejected { url, message, .. } => {
            println!("  -> rejected: {} ({})", url, message);
        }
        PipelineEvent::Cancelled { processed, total } => {
            println!("Cancelled after {} of {} URLs", processed, total);
        }
        PipelineEvent::Completed { accepted, rejected } => {
            println!("Done: {} accepted, {} rejected", accepted, rejected);
        }
    }
}
