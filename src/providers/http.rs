//! HTTP transport shared by every provider dialect
//!
//! Owns the `reqwest` client, per-call retry execution and the mapping from
//! HTTP failures to [`LlmError::LlmCall`].

use crate::error::{CallFailureKind, LlmError, LlmResult};
use crate::logging::{log_debug, log_error};
use crate::retry::{RetryExecutor, RetryPolicy};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::time::Duration;

const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Transport for one provider
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    provider: String,
    retry_policy: RetryPolicy,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the HTTP client cannot be built.
    pub fn new(provider: impl Into<String>, retry_policy: RetryPolicy) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(retry_policy.request_timeout)
            .connect_timeout(retry_policy.request_timeout.min(Duration::from_secs(30)))
            .build()
            .map_err(|e| {
                LlmError::configuration_error(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            provider: provider.into(),
            retry_policy,
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// POST a JSON body and return the raw success body, retrying per policy.
    pub async fn post_json(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &serde_json::Value,
    ) -> LlmResult<String> {
        log_debug!(
            provider = %self.provider,
            url = %url,
            max_attempts = self.retry_policy.max_attempts,
            "Sending provider request"
        );

        RetryExecutor::new(&self.retry_policy, &self.provider)
            .execute(move || async move {
                let request = self.client.post(url).headers(headers.clone()).json(body);
                self.execute_single_request(url, request).await
            })
            .await
    }

    /// GET and return the raw success body. Single attempt.
    pub async fn get(&self, url: &str, headers: &HeaderMap) -> LlmResult<String> {
        let request = self.client.get(url).headers(headers.clone());
        self.execute_single_request(url, request).await
    }

    async fn execute_single_request(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> LlmResult<String> {
        let response = request.send().await.map_err(|e| {
            log_error!(
                provider = %self.provider,
                url = %url,
                error = %e,
                "HTTP request failed"
            );
            let kind = if e.is_timeout() {
                CallFailureKind::Timeout
            } else {
                CallFailureKind::Network
            };
            LlmError::llm_call(
                &self.provider,
                kind,
                None,
                format!("Request failed: {e}"),
                Some(Box::new(e)),
            )
        })?;

        if !response.status().is_success() {
            return Err(self.handle_error_response(response).await);
        }

        response.text().await.map_err(|e| {
            LlmError::llm_call(
                &self.provider,
                CallFailureKind::InvalidResponse,
                None,
                format!("Failed to read response: {e}"),
                Some(Box::new(e)),
            )
        })
    }

    /// Handle non-success HTTP responses
    async fn handle_error_response(&self, response: reqwest::Response) -> LlmError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let kind = classify_status(status, retry_after);
        LlmError::llm_call(
            &self.provider,
            kind,
            Some(status.as_u16()),
            vendor_error_message(&error_text),
            None,
        )
    }
}

pub(crate) fn classify_status(status: StatusCode, retry_after: Option<u64>) -> CallFailureKind {
    match status.as_u16() {
        401 | 403 => CallFailureKind::Authentication,
        429 => CallFailureKind::RateLimited {
            retry_after_seconds: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECONDS),
        },
        408 => CallFailureKind::Timeout,
        _ => CallFailureKind::Vendor,
    }
}

/// Pull the human-readable message out of a vendor error body.
///
/// OpenAI, Anthropic and Gemini all use `{"error": {"message": ...}}`; some
/// OpenAI-compatible servers put a bare string under `error` or `detail`.
pub(crate) fn vendor_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return if body.trim().is_empty() {
            "empty error body".to_string()
        } else {
            body.trim().to_string()
        };
    };

    let error = json.get("error");
    error
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .or_else(|| error.and_then(|e| e.as_str()))
        .or_else(|| json.get("detail").and_then(|d| d.as_str()))
        .or_else(|| json.get("message").and_then(|m| m.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
