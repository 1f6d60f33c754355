//! Provider wire dialects
//!
//! Every registry entry speaks one of three dialects:
//!
//! - **openai_shared**: OpenAI chat completions (openai, azure_openai, groq,
//!   fireworks, llama_qwen)
//! - **anthropic**: Anthropic Messages API
//! - **gemini**: Google `generateContent`
//!
//! ## Architecture
//!
//! ```text
//! client.rs ──> build_request / normalize_response ──> http.rs
//!                  |            |            |
//!            openai_shared  anthropic     gemini
//! ```
//!
//! Dialect modules are pure conversion. All I/O lives in [`http`].

pub(crate) mod anthropic;
pub(crate) mod gemini;
pub(crate) mod http;
pub(crate) mod openai_shared;

use crate::config::{ApiFormat, ProviderConfig};
use crate::core_types::{ChatOptions, Message, MessageRole, NormalizedResponse};
use crate::credentials::Credentials;
use crate::error::{CallFailureKind, LlmError, LlmResult};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A fully built vendor request, ready for the transport.
#[derive(Debug, Clone)]
pub(crate) struct ProviderRequest {
    pub url: String,
    pub body: serde_json::Value,
}

/// Rewrite a conversation for endpoints without a system role.
///
/// Pending system text is prepended to the next user turn, separated by a
/// blank line. If an assistant turn arrives first, the pending text is
/// emitted as its own user turn ahead of it. Trailing system text becomes a
/// final user turn. System text is never dropped.
pub(crate) fn fold_system_into_first_user(messages: &[Message]) -> Vec<Message> {
    let mut folded = Vec::with_capacity(messages.len());
    let mut pending: Vec<&str> = Vec::new();

    for msg in messages {
        match msg.role {
            MessageRole::System => pending.push(&msg.content),
            MessageRole::User if !pending.is_empty() => {
                pending.push(&msg.content);
                folded.push(Message::user(pending.join("\n\n")));
                pending.clear();
            }
            MessageRole::Assistant if !pending.is_empty() => {
                folded.push(Message::user(pending.join("\n\n")));
                pending.clear();
                folded.push(msg.clone());
            }
            MessageRole::User | MessageRole::Assistant => folded.push(msg.clone()),
        }
    }

    if !pending.is_empty() {
        folded.push(Message::user(pending.join("\n\n")));
    }

    folded
}

/// Translate unified messages into the provider's request.
///
/// # Errors
///
/// Returns [`LlmError::ConfigurationError`] if the body cannot be serialized.
pub(crate) fn build_request(
    config: &ProviderConfig,
    credentials: &Credentials,
    model: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> LlmResult<ProviderRequest> {
    match config.api_format {
        ApiFormat::OpenAiChat => Ok(ProviderRequest {
            url: openai_shared::conversion::chat_url(config, credentials),
            body: to_body(&openai_shared::conversion::build_request(
                config, model, messages, options,
            ))?,
        }),
        ApiFormat::AnthropicMessages => Ok(ProviderRequest {
            url: anthropic::conversion::messages_url(config),
            body: to_body(&anthropic::conversion::build_request(model, messages, options))?,
        }),
        ApiFormat::GeminiGenerateContent => Ok(ProviderRequest {
            url: gemini::conversion::generate_url(config, model),
            body: to_body(&gemini::conversion::build_request(model, messages, options))?,
        }),
    }
}

fn to_body(request: &impl Serialize) -> LlmResult<serde_json::Value> {
    serde_json::to_value(request)
        .map_err(|e| LlmError::configuration_error(format!("Failed to serialize request: {e}")))
}

/// Credential headers plus any dialect-specific headers.
pub(crate) fn request_headers(
    config: &ProviderConfig,
    credentials: &Credentials,
) -> LlmResult<HeaderMap> {
    let mut headers = credentials.headers()?;
    if config.api_format == ApiFormat::AnthropicMessages {
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(anthropic::conversion::API_VERSION),
        );
    }
    Ok(headers)
}

/// Decode a successful vendor body into the normalized shape.
///
/// # Errors
///
/// Returns [`LlmError::LlmCall`] with [`CallFailureKind::InvalidResponse`]
/// when the body is not the dialect's response JSON.
pub(crate) fn normalize_response(
    config: &ProviderConfig,
    body: &str,
) -> LlmResult<NormalizedResponse> {
    let provider = config.identifier.as_str();
    Ok(match config.api_format {
        ApiFormat::OpenAiChat => openai_shared::conversion::normalize(decode(provider, body)?),
        ApiFormat::AnthropicMessages => anthropic::conversion::normalize(decode(provider, body)?),
        ApiFormat::GeminiGenerateContent => gemini::conversion::normalize(decode(provider, body)?),
    })
}

pub(crate) fn models_url(config: &ProviderConfig, credentials: &Credentials) -> String {
    match config.api_format {
        ApiFormat::OpenAiChat => openai_shared::conversion::models_url(config, credentials),
        ApiFormat::AnthropicMessages => anthropic::conversion::models_url(config),
        ApiFormat::GeminiGenerateContent => gemini::conversion::models_url(config),
    }
}

pub(crate) fn parse_model_list(config: &ProviderConfig, body: &str) -> LlmResult<Vec<String>> {
    let provider = config.identifier.as_str();
    Ok(match config.api_format {
        ApiFormat::OpenAiChat => openai_shared::conversion::model_ids(decode(provider, body)?),
        ApiFormat::AnthropicMessages => anthropic::conversion::model_ids(decode(provider, body)?),
        ApiFormat::GeminiGenerateContent => gemini::conversion::model_ids(decode(provider, body)?),
    })
}

fn decode<T: DeserializeOwned>(provider: &str, body: &str) -> LlmResult<T> {
    serde_json::from_str(body).map_err(|e| {
        LlmError::llm_call(
            provider,
            CallFailureKind::InvalidResponse,
            None,
            format!("Failed to parse response: {e}"),
            Some(Box::new(e)),
        )
    })
}

#[cfg(test)]
mod tests;
