//! Command line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "obligo",
    version,
    about = "Find obligation-like sentences in documents and summarize them as events."
)]
pub struct Cli {
    /// Data directory holding pdf/, text/ and events/ (default: $OBLIGO_DATA_DIR or ./data)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Expected fraction of anomalous sentences, in (0, 1)
    #[arg(long, global = true)]
    pub contamination: Option<f64>,

    /// Sentences with fewer tokens are discarded
    #[arg(long, global = true)]
    pub min_tokens: Option<usize>,

    /// Print stage reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert pdf/**/*.pdf to text/<stem>.txt
    ExtractText,

    /// Normalize text/*.txt in place
    Clean,

    /// Write obligation candidates to text/json/<stem>.json
    Detect,

    /// Summarize candidate files into events/aiEvent<stem>.txt
    Summarize(LlmArgs),

    /// Extract, clean, detect and summarize
    Run(LlmArgs),
}

#[derive(Args, Debug, Default)]
pub struct LlmArgs {
    /// ollama, openai, anthropic, groq or auto (overrides llm-config.json)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model name for the chosen provider
    #[arg(long)]
    pub model: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
