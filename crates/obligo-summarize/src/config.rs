//! LLM configuration loading and provider selection.

use std::path::Path;

use serde::Deserialize;

use crate::types::{LLMProvider, ResolvedProvider};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama2:7b";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Seconds before a single summarization request is abandoned.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// LLM configuration, read from llm-config.json.
#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,
    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_ollama_host() -> String {
    DEFAULT_OLLAMA_HOST.into()
}
fn default_ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            ollama_host: default_ollama_host(),
            ollama_model: default_ollama_model(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = std::env::var("GROQ_API_KEY").ok();
        }
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            if config.ollama_host == DEFAULT_OLLAMA_HOST && !host.is_empty() {
                config.ollama_host = normalize_host(&host);
            }
        }

        config
    }

    /// Resolve which provider and model to use.
    ///
    /// In auto mode hosted providers win when a key is present
    /// (Anthropic > Groq > OpenAI); otherwise the local Ollama server is used.
    pub fn resolve_provider(&self) -> Option<ResolvedProvider> {
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "ollama" => Some(self.ollama()),
                "openai" => self.openai_api_key.as_ref().map(|k| self.openai(k)),
                "anthropic" => self.anthropic_api_key.as_ref().map(|k| self.anthropic(k)),
                "groq" => self.groq_api_key.as_ref().map(|k| self.groq(k)),
                _ => None,
            };
        }

        if let Some(k) = &self.anthropic_api_key {
            return Some(self.anthropic(k));
        }
        if let Some(k) = &self.groq_api_key {
            return Some(self.groq(k));
        }
        if let Some(k) = &self.openai_api_key {
            return Some(self.openai(k));
        }
        Some(self.ollama())
    }

    fn ollama(&self) -> ResolvedProvider {
        ResolvedProvider {
            provider: LLMProvider::Ollama,
            model: self.ollama_model.clone(),
            api_key: None,
            base_url: normalize_host(&self.ollama_host),
        }
    }

    fn openai(&self, key: &str) -> ResolvedProvider {
        ResolvedProvider {
            provider: LLMProvider::OpenAI,
            model: self.openai_model.clone(),
            api_key: Some(key.to_string()),
            base_url: OPENAI_BASE_URL.into(),
        }
    }

    fn anthropic(&self, key: &str) -> ResolvedProvider {
        ResolvedProvider {
            provider: LLMProvider::Anthropic,
            model: self.anthropic_model.clone(),
            api_key: Some(key.to_string()),
            base_url: ANTHROPIC_BASE_URL.into(),
        }
    }

    fn groq(&self, key: &str) -> ResolvedProvider {
        ResolvedProvider {
            provider: LLMProvider::Groq,
            model: self.groq_model.clone(),
            api_key: Some(key.to_string()),
            base_url: GROQ_BASE_URL.into(),
        }
    }
}

/// `OLLAMA_HOST` may be a bare `host:port`.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}
