//! Anthropic API request and response type definitions

use crate::core_types::TokenUsage;
use serde::{Deserialize, Serialize};

/// Anthropic Messages API request structure
#[derive(Debug, Serialize, Clone)]
pub(crate) struct AnthropicRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<AnthropicMessage>,
    pub model: String,
    pub max_tokens: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Anthropic message structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub(crate) struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Anthropic content block structure
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub(crate) enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Anthropic API response structure
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AnthropicResponse {
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

/// Anthropic usage information
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

impl From<AnthropicUsage> for TokenUsage {
    fn from(usage: AnthropicUsage) -> Self {
        Self {
            prompt_tokens: usage.input_tokens,
            completion_tokens: usage.output_tokens,
            total_tokens: usage.input_tokens.saturating_add(usage.output_tokens),
        }
    }
}

/// `GET /models` listing
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AnthropicModelList {
    #[serde(default)]
    pub data: Vec<AnthropicModel>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AnthropicModel {
    pub id: String,
}
