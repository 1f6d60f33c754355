//! Unified client facade over every registered provider.

use crate::config::{EnvSource, ProcessEnv, ProviderConfig, ProviderRegistry};
use crate::core_types::{ChatOptions, IntoMessages, Message, NormalizedResponse, ProviderInfo};
use crate::credentials::Credentials;
use crate::error::LlmResult;
use crate::logging::{log_debug, log_info, log_warn};
use crate::providers::{self, http::HttpTransport};
use crate::retry::RetryPolicy;

/// A provider/model pair ready to send chat requests.
///
/// Construction resolves everything up front: the registry entry, the model
/// and the credentials. After that the wrapper is immutable and can be shared
/// across tasks; each call is an independent request.
#[derive(Debug, Clone)]
pub struct LlmWrapper<'r> {
    model: String,
    config: &'r ProviderConfig,
    credentials: Credentials,
    transport: HttpTransport,
}

impl LlmWrapper<'static> {
    /// Create a wrapper from the builtin registry and the process environment.
    ///
    /// `model` of `None` or `""` selects the provider's default model.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnsupportedProvider`](crate::LlmError::UnsupportedProvider)
    /// for an unknown identifier and
    /// [`LlmError::MissingCredentials`](crate::LlmError::MissingCredentials)
    /// when a required environment variable is unset.
    pub fn new(provider_name: &str, model: Option<&str>) -> LlmResult<Self> {
        Self::create(ProviderRegistry::builtin(), provider_name, model, &ProcessEnv)
    }

    /// Identifiers of every builtin provider, in registration order.
    pub fn list_providers() -> Vec<&'static str> {
        ProviderRegistry::builtin().list_providers()
    }

    /// Models the provider reports, using the builtin registry and process
    /// environment. See [`LlmWrapper::list_models_in`].
    pub async fn list_models(provider_name: &str) -> LlmResult<Vec<String>> {
        Self::list_models_in(ProviderRegistry::builtin(), provider_name, &ProcessEnv).await
    }
}

impl<'r> LlmWrapper<'r> {
    /// Create a wrapper against an explicit registry and environment source.
    pub fn create(
        registry: &'r ProviderRegistry,
        provider_name: &str,
        model: Option<&str>,
        env: &impl EnvSource,
    ) -> LlmResult<Self> {
        let config = registry.lookup(provider_name)?;

        let model = match model {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => config.default_model.clone(),
        };

        let credentials = Credentials::resolve(config, env)?;
        let transport = HttpTransport::new(&config.identifier, RetryPolicy::for_provider(config))?;

        log_debug!(
            provider = %config.identifier,
            model = %model,
            adapter = config.uses_adapter_library,
            "LlmWrapper created"
        );

        Ok(Self {
            model,
            config,
            credentials,
            transport,
        })
    }

    /// Replace the transport's retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`](crate::LlmError::ConfigurationError)
    /// if the HTTP client cannot be rebuilt with the new timeout.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> LlmResult<Self> {
        self.transport = HttpTransport::new(&self.config.identifier, retry_policy)?;
        Ok(self)
    }

    pub fn provider_name(&self) -> &str {
        &self.config.identifier
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn config(&self) -> &'r ProviderConfig {
        self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        self.transport.retry_policy()
    }

    /// Send a conversation and return the normalized reply.
    ///
    /// Messages are validated before any network activity. Transport and
    /// HTTP failures come back as [`LlmError::LlmCall`](crate::LlmError::LlmCall);
    /// a 2xx reply without a usable completion comes back as `Ok` with
    /// `error: true`.
    pub async fn chat(
        &self,
        messages: impl IntoMessages,
        options: Option<ChatOptions>,
    ) -> LlmResult<NormalizedResponse> {
        let messages = messages.into_messages()?;
        let options = options.unwrap_or_default();

        let request = providers::build_request(
            self.config,
            &self.credentials,
            &self.model,
            &messages,
            &options,
        )?;
        let headers = providers::request_headers(self.config, &self.credentials)?;

        log_debug!(
            provider = %self.config.identifier,
            model = %self.model,
            message_count = messages.len(),
            "Sending chat request"
        );

        let body = self
            .transport
            .post_json(&request.url, &headers, &request.body)
            .await?;
        let response = providers::normalize_response(self.config, &body)?;

        if response.error {
            log_warn!(
                provider = %self.config.identifier,
                model = %self.model,
                reason = %response.message,
                "Provider returned no completion"
            );
        } else {
            log_info!(
                provider = %self.config.identifier,
                model = %self.model,
                total_tokens = response.usage.map(|u| u.total_tokens),
                "Chat completed"
            );
        }

        Ok(response)
    }

    /// Send a single user turn and return only the reply text.
    pub async fn simple_chat(
        &self,
        prompt: &str,
        options: Option<ChatOptions>,
    ) -> LlmResult<String> {
        let response = self.chat(vec![Message::user(prompt)], options).await?;
        Ok(response.message)
    }

    pub fn get_provider_info(&self) -> ProviderInfo {
        ProviderInfo {
            provider: self.config.identifier.clone(),
            model: self.model.clone(),
            base_url: self.config.base_url.clone(),
            timeout: self.config.timeout_seconds,
            max_retries: self.config.max_retries,
            langchain_support: self.config.uses_adapter_library,
        }
    }

    /// Models the provider reports.
    ///
    /// An empty list means "unknown": missing credentials, a provider without
    /// a listing endpoint and any failure while listing all yield `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Only [`LlmError::UnsupportedProvider`](crate::LlmError::UnsupportedProvider).
    pub async fn list_models_in(
        registry: &ProviderRegistry,
        provider_name: &str,
        env: &impl EnvSource,
    ) -> LlmResult<Vec<String>> {
        let config = registry.lookup(provider_name)?;

        if !config.supports_model_listing {
            log_warn!(provider = %config.identifier, "Provider does not support model listing");
            return Ok(Vec::new());
        }

        let credentials = match Credentials::resolve(config, env) {
            Ok(credentials) => credentials,
            Err(e) => {
                log_warn!(
                    provider = %config.identifier,
                    error = %e,
                    "Cannot list models without credentials"
                );
                return Ok(Vec::new());
            }
        };

        match fetch_models(config, &credentials).await {
            Ok(models) => {
                log_debug!(
                    provider = %config.identifier,
                    count = models.len(),
                    "Listed provider models"
                );
                Ok(models)
            }
            Err(e) => {
                log_warn!(
                    provider = %config.identifier,
                    error = %e,
                    "Model listing failed"
                );
                Ok(Vec::new())
            }
        }
    }
}

async fn fetch_models(config: &ProviderConfig, credentials: &Credentials) -> LlmResult<Vec<String>> {
    let transport = HttpTransport::new(&config.identifier, RetryPolicy::for_provider(config))?;
    let headers = providers::request_headers(config, credentials)?;
    let body = transport
        .get(&providers::models_url(config, credentials), &headers)
        .await?;
    providers::parse_model_list(config, &body)
}
