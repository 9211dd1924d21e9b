//! Obligo — obligation candidate extraction from document collections.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use obligo_core::ObligoConfig;
use obligo_runtime::{Pipeline, RunReport, SummaryReport};
use obligo_summarize::{LLMConfig, LlmSummarizer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{Cli, Commands, LlmArgs};

fn resolve_data_dir() -> PathBuf {
    std::env::var("OBLIGO_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn build_config(cli: &Cli) -> anyhow::Result<ObligoConfig> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let mut config = ObligoConfig::from_env(&data_dir)?;
    if let Some(c) = cli.contamination {
        config.detection.contamination = c;
    }
    if let Some(n) = cli.min_tokens {
        config.detection.min_tokens = n;
    }
    config.detection.validate()?;
    Ok(config)
}

fn build_summarizer(config: &ObligoConfig, args: &LlmArgs) -> anyhow::Result<LlmSummarizer> {
    let mut llm = LLMConfig::load(&config.data_paths.llm_config_file);
    if let Some(p) = &args.provider {
        llm.preferred_provider = p.clone();
    }
    if let Some(t) = args.timeout {
        llm.timeout_secs = t;
    }
    let mut target = llm
        .resolve_provider()
        .with_context(|| format!("No usable LLM provider for '{}'", llm.preferred_provider))?;
    if let Some(m) = &args.model {
        target.model = m.clone();
    }
    info!("Summarizing with {} ({})", target.provider, target.model);
    Ok(LlmSummarizer::new(target, llm.timeout_secs)?)
}

fn print_detection(report: &RunReport, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} documents, {} sentences, {} anomalous, {} candidates (threshold {:.6})",
            report.documents, report.sentences, report.anomalous, report.candidates, report.threshold
        );
    }
    Ok(())
}

fn print_summaries(report: &SummaryReport, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} summaries written for {} documents",
            report.summaries, report.documents
        );
        for failure in &report.failures {
            eprintln!("  failed: {}", failure);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    info!("Data directory: {}", config.data_paths.root.display());

    let as_json = cli.json;
    let pipeline = Pipeline::new(config);

    let clean_run = match &cli.command {
        Commands::ExtractText => {
            let written = pipeline.extract_text()?;
            println!("Extracted {} text files", written.len());
            true
        }
        Commands::Clean => {
            let cleaned = pipeline.clean()?;
            println!("Cleaned {} text files", cleaned);
            true
        }
        Commands::Detect => {
            let report = pipeline.detect()?;
            print_detection(&report, as_json)?;
            true
        }
        Commands::Summarize(args) => {
            let summarizer = build_summarizer(pipeline.config(), args)?;
            let report = pipeline.summarize(&summarizer).await?;
            print_summaries(&report, as_json)?;
            report.is_clean()
        }
        Commands::Run(args) => {
            let summarizer = build_summarizer(pipeline.config(), args)?;
            let (detection, summaries) = pipeline.run(&summarizer).await?;
            print_detection(&detection, as_json)?;
            print_summaries(&summaries, as_json)?;
            summaries.is_clean()
        }
    };

    if !clean_run {
        std::process::exit(1);
    }
    Ok(())
}
