//! Test helper utilities for llm-wrapper integration tests
//!
//! Reusable fixtures: registries pointed at a wiremock server, fake
//! environments, fast retry policies and canned vendor responses.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use llm_wrapper::{ProviderRegistry, RetryPolicy};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::MockServer;

/// Builtin entries for `providers`, re-pointed at the mock server.
///
/// Each base URL keeps the builtin path suffix (`/v1`, `/openai/v1`,
/// `/v1beta`) so request paths match what the real vendors receive.
///
/// # Panics
///
/// Panics if a provider is not builtin (test failure is appropriate).
pub fn mock_registry(server: &MockServer, providers: &[&str]) -> ProviderRegistry {
    let configs = providers
        .iter()
        .map(|name| {
            let builtin = ProviderRegistry::builtin()
                .lookup(name)
                .unwrap_or_else(|_| panic!("Unsupported test provider: {name}"))
                .clone();
            let path = builtin
                .base_url
                .splitn(4, '/')
                .nth(3)
                .map(|p| format!("/{p}"))
                .unwrap_or_default();
            let base_url = format!("{}{}", server.uri(), path);
            builtin.with_base_url(base_url)
        })
        .collect();

    ProviderRegistry::new(configs).expect("builtin identifiers are unique")
}

/// Environment carrying `pairs` only.
pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Azure environment whose endpoint is the mock server.
pub fn azure_env(server: &MockServer) -> HashMap<String, String> {
    env(&[
        ("AZURE_OPENAI_API_KEY", "azure-test-key"),
        ("AZURE_OPENAI_ENDPOINT", &server.uri()),
        ("AZURE_OPENAI_DEPLOYMENT", "gpt4o-test"),
    ])
}

/// Retry policy with millisecond delays to keep tests fast.
pub fn fast_retry_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
        backoff_multiplier: 2.0,
        request_timeout: Duration::from_secs(5),
    }
}

pub fn openai_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

pub fn anthropic_message(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-opus-20240229",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 20, "output_tokens": 4}
    })
}

pub fn gemini_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 3, "totalTokenCount": 11},
        "modelVersion": "gemini-1.5-flash"
    })
}
