//! Obligo Summarize — turns obligation candidates into calendar-style events.
//!
//! Calls go to a local Ollama server or to a hosted API (OpenAI, Groq,
//! Anthropic). One request per candidate, no streaming, no retries.

pub mod config;
pub mod prompt;
pub mod providers;
pub mod types;

use std::future::Future;

pub use config::LLMConfig;
pub use prompt::build_prompt;
pub use providers::LlmSummarizer;
pub use types::*;

/// Anything that can turn one candidate text into a summary.
pub trait Summarizer {
    fn summarize(&self, text: &str) -> impl Future<Output = Result<String, SummaryError>> + Send;
}
