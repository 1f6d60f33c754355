//! Conversion between unified types and Gemini `generateContent`
//!
//! System turns become `systemInstruction` and assistant turns use the
//! `model` role. Gemma models reject `systemInstruction`, so for them the
//! system text is folded into the first user turn instead.

use super::types::{
    GeminiContent, GeminiModelList, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig,
};
use crate::config::ProviderConfig;
use crate::core_types::{ChatOptions, Message, MessageRole, NormalizedResponse};
use crate::logging::log_debug;
use crate::providers::fold_system_into_first_user;

const MODEL_PREFIX: &str = "models/";

/// Model id without the `models/` resource prefix.
pub(crate) fn bare_model_name(model: &str) -> &str {
    model.strip_prefix(MODEL_PREFIX).unwrap_or(model)
}

fn is_gemma(model: &str) -> bool {
    bare_model_name(model).to_ascii_lowercase().starts_with("gemma")
}

pub(crate) fn build_request(
    model: &str,
    messages: &[Message],
    options: &ChatOptions,
) -> GeminiRequest {
    let (system_instruction, contents) = if is_gemma(model) {
        log_debug!(model = %model, "Folding system text into first user turn for Gemma");
        let folded = fold_system_into_first_user(messages);
        (None, folded.iter().map(to_content).collect())
    } else {
        split_system_instruction(messages)
    };

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: generation_config(options),
    }
}

fn split_system_instruction(messages: &[Message]) -> (Option<GeminiContent>, Vec<GeminiContent>) {
    let system_parts: Vec<GeminiPart> = messages
        .iter()
        .filter(|m| m.role == MessageRole::System)
        .map(|m| text_part(&m.content))
        .collect();
    let contents = messages
        .iter()
        .filter(|m| m.role != MessageRole::System)
        .map(to_content)
        .collect();

    let instruction = (!system_parts.is_empty()).then(|| GeminiContent {
        role: None,
        parts: system_parts,
    });
    (instruction, contents)
}

fn text_part(text: &str) -> GeminiPart {
    GeminiPart {
        text: Some(text.to_string()),
    }
}

fn to_content(msg: &Message) -> GeminiContent {
    let role = match msg.role {
        MessageRole::Assistant => "model",
        MessageRole::User | MessageRole::System => "user",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![text_part(&msg.content)],
    }
}

fn generation_config(options: &ChatOptions) -> Option<GenerationConfig> {
    let config = GenerationConfig {
        temperature: options.temperature,
        max_output_tokens: options.max_tokens,
        top_p: options.top_p,
        stop_sequences: (!options.stop.is_empty()).then(|| options.stop.clone()),
    };
    (config != GenerationConfig::default()).then_some(config)
}

pub(crate) fn generate_url(config: &ProviderConfig, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        config.base_url.trim_end_matches('/'),
        bare_model_name(model)
    )
}

pub(crate) fn models_url(config: &ProviderConfig) -> String {
    format!("{}/models", config.base_url.trim_end_matches('/'))
}

pub(crate) fn normalize(response: GeminiResponse) -> NormalizedResponse {
    let usage = response.usage_metadata.map(Into::into);
    let model = response.model_version;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return NormalizedResponse::failure(format!("Prompt was blocked: {reason}"), usage)
            .with_model(model);
    };

    let finish_reason = candidate.finish_reason;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let normalized = match finish_reason.as_deref() {
        Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST") => {
            NormalizedResponse::failure("Completion was blocked by safety filters", usage)
        }
        _ if text.is_empty() => {
            NormalizedResponse::failure("Provider returned no text content", usage)
        }
        _ => NormalizedResponse::completion(text, usage),
    };

    normalized
        .with_model(model)
        .with_finish_reason(finish_reason)
}

pub(crate) fn model_ids(list: GeminiModelList) -> Vec<String> {
    list.models
        .into_iter()
        .map(|m| bare_model_name(&m.name).to_string())
        .collect()
}
