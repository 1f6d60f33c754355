//! Message conversion between unified format and Anthropic API format
//!
//! Anthropic takes system text as a top-level field and expects user and
//! assistant turns to alternate, so consecutive same-role turns are merged.

use super::types::{
    AnthropicContentBlock, AnthropicMessage, AnthropicModelList, AnthropicRequest,
    AnthropicResponse,
};
use crate::config::ProviderConfig;
use crate::core_types::{ChatOptions, Message, MessageRole, NormalizedResponse};
use crate::logging::log_debug;

/// Sent when the caller gives no `max_tokens`; the Messages API requires one.
pub(crate) const DEFAULT_MAX_TOKENS: i64 = 1024;

pub(crate) const API_VERSION: &str = "2023-06-01";

pub(crate) fn build_request(
    model: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> AnthropicRequest {
    let (system, conversation) = separate_system_and_conversation_messages(messages);

    AnthropicRequest {
        system,
        messages: combine_conversation_messages(&conversation),
        model: model.to_string(),
        max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: options.temperature,
        top_p: options.top_p,
        stop_sequences: (!options.stop.is_empty()).then(|| options.stop.clone()),
    }
}

fn separate_system_and_conversation_messages(
    messages: &[Message],
) -> (Option<String>, Vec<&Message>) {
    let mut system_parts = Vec::new();
    let mut conversation = Vec::new();

    for msg in messages {
        match msg.role {
            MessageRole::System => system_parts.push(msg.content.as_str()),
            MessageRole::User | MessageRole::Assistant => conversation.push(msg),
        }
    }

    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));
    (system, conversation)
}

fn combine_conversation_messages(conversation: &[&Message]) -> Vec<AnthropicMessage> {
    let mut combined: Vec<AnthropicMessage> = Vec::new();

    for msg in conversation {
        let role = msg.role.as_str();
        match combined.last_mut() {
            Some(last) if last.role == role => {
                log_debug!(
                    provider = "anthropic",
                    role = role,
                    "Combining consecutive messages with same role"
                );
                last.content.push('\n');
                last.content.push_str(&msg.content);
            }
            _ => combined.push(AnthropicMessage {
                role: role.to_string(),
                content: msg.content.clone(),
            }),
        }
    }

    combined
}

pub(crate) fn messages_url(config: &ProviderConfig) -> String {
    format!("{}/messages", config.base_url.trim_end_matches('/'))
}

pub(crate) fn models_url(config: &ProviderConfig) -> String {
    format!("{}/models", config.base_url.trim_end_matches('/'))
}

pub(crate) fn normalize(response: AnthropicResponse) -> NormalizedResponse {
    let usage = response.usage.map(Into::into);
    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .collect();

    let normalized = if response.stop_reason.as_deref() == Some("refusal") {
        NormalizedResponse::failure("Model refused the request", usage)
    } else if text.is_empty() {
        NormalizedResponse::failure("Provider returned no text content", usage)
    } else {
        NormalizedResponse::completion(text, usage)
    };

    normalized
        .with_model(response.model)
        .with_finish_reason(response.stop_reason)
}

pub(crate) fn model_ids(list: AnthropicModelList) -> Vec<String> {
    list.data.into_iter().map(|m| m.id).collect()
}
