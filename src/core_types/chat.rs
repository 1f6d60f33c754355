//! Request options and the normalized response shape

use serde::{Deserialize, Serialize};

/// Per-call generation options.
///
/// Values are forwarded to the vendor unmodified. Nothing is clamped or
/// range-checked here; a negative `max_tokens` reaches the provider, which
/// is the one to reject it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Sampling temperature
    pub temperature: Option<f64>,
    /// Maximum tokens to generate
    pub max_tokens: Option<i64>,
    /// Top-p sampling parameter
    pub top_p: Option<f64>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used (prompt + completion)
    pub total_tokens: u32,
}

/// The single shape returned by every provider.
///
/// When `error` is `true`, `message` describes why the vendor produced no
/// completion (blocked prompt, refusal, empty reply) and must not be shown as
/// model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub message: String,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// Model name as reported by the vendor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl NormalizedResponse {
    pub fn completion(message: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            message: message.into(),
            error: false,
            usage,
            model: None,
            finish_reason: None,
        }
    }

    pub fn failure(message: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            message: message.into(),
            error: true,
            usage,
            model: None,
            finish_reason: None,
        }
    }

    pub(crate) fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    pub(crate) fn with_finish_reason(mut self, finish_reason: Option<String>) -> Self {
        self.finish_reason = finish_reason;
        self
    }
}

/// Read-only snapshot of a facade's resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    /// Per-attempt timeout in seconds
    pub timeout: u64,
    pub max_retries: u32,
    /// The registry's adapter-library flag, verbatim
    pub langchain_support: bool,
}
