//! Non-streaming completion calls against each provider.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API. Ollama uses its native `/api/generate` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LLMConfig;
use crate::prompt::build_prompt;
use crate::types::{LLMProvider, ResolvedProvider, SummaryError};
use crate::Summarizer;

const MAX_TOKENS: usize = 512;
const TEMPERATURE: f64 = 0.2;

/// Summarizer backed by one resolved LLM provider.
#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: Client,
    target: ResolvedProvider,
    timeout_secs: u64,
}

impl LlmSummarizer {
    pub fn new(target: ResolvedProvider, timeout_secs: u64) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SummaryError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            target,
            timeout_secs,
        })
    }

    pub fn from_config(config: &LLMConfig) -> Result<Self, SummaryError> {
        let target = config
            .resolve_provider()
            .ok_or_else(|| SummaryError::NotConfigured(config.preferred_provider.clone()))?;
        Self::new(target, config.timeout_secs)
    }

    pub fn provider(&self) -> LLMProvider {
        self.target.provider
    }

    pub fn model(&self) -> &str {
        &self.target.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, SummaryError> {
        let t = &self.target;
        debug!("Summarizing with {} model {}", t.provider, t.model);

        let request = match t.provider {
            LLMProvider::Ollama => self
                .client
                .post(format!("{}/api/generate", t.base_url))
                .json(&json!({
                    "model": t.model,
                    "prompt": prompt,
                    "stream": false,
                })),
            LLMProvider::OpenAI | LLMProvider::Groq => self
                .client
                .post(format!("{}/chat/completions", t.base_url))
                .header(
                    "Authorization",
                    format!("Bearer {}", t.api_key.as_deref().unwrap_or_default()),
                )
                .json(&json!({
                    "model": t.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "temperature": TEMPERATURE,
                    "max_tokens": MAX_TOKENS,
                })),
            LLMProvider::Anthropic => self
                .client
                .post(format!("{}/messages", t.base_url))
                .header("x-api-key", t.api_key.as_deref().unwrap_or_default())
                .header("anthropic-version", "2023-06-01")
                .json(&json!({
                    "model": t.model,
                    "messages": [{"role": "user", "content": prompt}],
                    "temperature": TEMPERATURE,
                    "max_tokens": MAX_TOKENS,
                })),
        };

        let response = request.send().await.map_err(|e| self.map_transport(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Api { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SummaryError::MalformedResponse(e.to_string()))?;
        extract_text(t.provider, &body)
    }

    fn map_transport(&self, e: reqwest::Error) -> SummaryError {
        if e.is_timeout() {
            SummaryError::Timeout(self.timeout_secs)
        } else {
            SummaryError::Transport(e.to_string())
        }
    }
}

impl Summarizer for LlmSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        let prompt = build_prompt(text);
        Ok(self.complete(&prompt).await?.trim().to_string())
    }
}

/// Pull the generated text out of a provider's JSON response.
pub fn extract_text(provider: LLMProvider, body: &Value) -> Result<String, SummaryError> {
    let text = match provider {
        LLMProvider::Ollama => body["response"].as_str(),
        LLMProvider::OpenAI | LLMProvider::Groq => body["choices"][0]["message"]["content"].as_str(),
        LLMProvider::Anthropic => body["content"]
            .as_array()
            .and_then(|blocks| blocks.iter().find(|b| b["type"] == "text"))
            .and_then(|b| b["text"].as_str()),
    };
    text.map(str::to_string).ok_or_else(|| {
        SummaryError::MalformedResponse(format!("no completion text in {} response", provider))
    })
}
