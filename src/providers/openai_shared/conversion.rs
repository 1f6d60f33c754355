//! Conversion between unified types and the OpenAI chat completions format

use super::types::{OpenAIMessage, OpenAIModelList, OpenAIRequest, OpenAIResponse};
use crate::config::{ProviderConfig, SystemPrompt};
use crate::core_types::{ChatOptions, Message, NormalizedResponse};
use crate::credentials::Credentials;
use crate::logging::log_debug;
use crate::providers::fold_system_into_first_user;

/// Build the chat completions body. System turns stay inline unless the
/// provider folds them into the first user turn.
pub(crate) fn build_request(
    config: &ProviderConfig,
    model: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> OpenAIRequest {
    let folded;
    let messages = match config.system_prompt {
        SystemPrompt::FoldIntoFirstUser => {
            folded = fold_system_into_first_user(messages);
            folded.as_slice()
        }
        _ => messages,
    };

    OpenAIRequest {
        model: model.to_string(),
        messages: messages
            .iter()
            .map(|msg| OpenAIMessage {
                role: msg.role.as_str().to_string(),
                content: msg.content.clone(),
            })
            .collect(),
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        top_p: options.top_p,
        stop: (!options.stop.is_empty()).then(|| options.stop.clone()),
    }
}

/// Chat completions URL; Azure routes by deployment and api-version.
pub(crate) fn chat_url(config: &ProviderConfig, credentials: &Credentials) -> String {
    match credentials {
        Credentials::Azure {
            endpoint,
            deployment,
            api_version,
            ..
        } => format!(
            "{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}"
        ),
        _ => format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
    }
}

pub(crate) fn models_url(config: &ProviderConfig, credentials: &Credentials) -> String {
    match credentials {
        Credentials::Azure {
            endpoint,
            api_version,
            ..
        } => format!("{endpoint}/openai/models?api-version={api_version}"),
        _ => format!("{}/models", config.base_url.trim_end_matches('/')),
    }
}

/// Map a decoded chat completion onto the normalized shape.
pub(crate) fn normalize(response: OpenAIResponse) -> NormalizedResponse {
    let usage = response.usage.map(Into::into);
    let model = response.model;

    let Some(choice) = response.choices.into_iter().next() else {
        return NormalizedResponse::failure("Provider returned no choices", usage)
            .with_model(model);
    };

    let finish_reason = choice.finish_reason;
    let normalized = if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
        NormalizedResponse::failure(format!("Model refused the request: {refusal}"), usage)
    } else if finish_reason.as_deref() == Some("content_filter") {
        NormalizedResponse::failure("Completion was blocked by the content filter", usage)
    } else {
        match choice.message.content {
            Some(content) if !content.is_empty() => {
                NormalizedResponse::completion(content, usage)
            }
            _ =>NormalizedResponse::failure("Provider returned no message content", usage),
        }
    };

    log_debug!(
        error = normalized.error,
        finish_reason = ?finish_reason,
        "Normalized OpenAI-compatible response"
    );

    normalized
        .with_model(model)
        .with_finish_reason(finish_reason)
}

pub(crate) fn model_ids(list: OpenAIModelList) -> Vec<String> {
    list.data.into_iter().map(|m| m.id).collect()
}
