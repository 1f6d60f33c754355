// Unit Tests for the LlmWrapper Facade
//
// UNIT UNDER TEST: LlmWrapper (construction and offline behaviour)
//
// BUSINESS RESPONSIBILITY:
//   - Resolves provider, model and credentials once at construction
//   - Reports its resolved configuration without network access
//   - Rejects malformed input before any request is sent
//   - Lists models without ever failing on missing credentials
//
// TEST COVERAGE:
//   - Default vs explicit model selection
//   - Unsupported provider and missing credentials at construction
//   - get_provider_info fields and serialized keys
//   - Input validation short-circuits chat
//   - list_models fallbacks
//   - Send + Sync
//
// HTTP round trips are covered by the integration tests in tests/.

use crate::client::LlmWrapper;
use crate::config::{ProviderRegistry, AZURE_DEFAULT_API_VERSION};
use crate::core_types::{ChatOptions, Message};
use crate::error::LlmError;
use crate::retry::RetryPolicy;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    fn groq_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([("GROQ_API_KEY", "gsk-test")])
    }

    fn groq() -> LlmWrapper<'static> {
        LlmWrapper::create(ProviderRegistry::builtin(), "groq", None, &groq_env()).unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_wrapper_is_send_and_sync() {
        assert_send_sync::<LlmWrapper<'static>>();
    }

    #[test]
    fn test_default_model_when_none_or_empty() {
        let none = groq();
        let empty =
            LlmWrapper::create(ProviderRegistry::builtin(), "groq", Some(""), &groq_env()).unwrap();

        assert_eq!(none.model(), "llama3-8b-8192");
        assert_eq!(empty.model(), "llama3-8b-8192");
        assert_eq!(none.provider_name(), "groq");
    }

    #[test]
    fn test_explicit_model_is_used_verbatim() {
        let llm = LlmWrapper::create(
            ProviderRegistry::builtin(),
            "groq",
            Some("not-a-real-model"),
            &groq_env(),
        )
        .unwrap();

        assert_eq!(llm.model(), "not-a-real-model");
    }

    #[test]
    fn test_unsupported_provider_at_construction() {
        let err = LlmWrapper::create(ProviderRegistry::builtin(), "mistral", None, &groq_env())
            .unwrap_err();

        assert!(matches!(err, LlmError::UnsupportedProvider { .. }));
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_missing_credentials_at_construction() {
        let env: HashMap<&str, &str> = HashMap::new();

        let err = LlmWrapper::create(ProviderRegistry::builtin(), "fireworks", None, &env)
            .unwrap_err();

        assert!(matches!(err, LlmError::MissingCredentials { .. }));
        assert!(err.to_string().contains("API key"));
        assert!(err.to_string().contains("FIREWORKS_API_KEY"));
    }

    #[test]
    fn test_local_provider_needs_no_environment() {
        let env: HashMap<&str, &str> = HashMap::new();

        let llm = LlmWrapper::create(ProviderRegistry::builtin(), "llama_qwen", None, &env);

        assert!(llm.is_ok());
    }

    #[test]
    fn test_provider_info_reports_registry_values() {
        // Arrange
        let env = HashMap::from([("ANTHROPIC_API_KEY", "sk-ant")]);
        let llm =
            LlmWrapper::create(ProviderRegistry::builtin(), "anthropic", None, &env).unwrap();

        // Act
        let info = llm.get_provider_info();

        // Assert
        assert_eq!(info.provider, "anthropic");
        assert_eq!(info.model, "claude-3-opus-20240229");
        assert_eq!(info.base_url, "https://api.anthropic.com/v1");
        assert_eq!(info.timeout, 60);
        assert_eq!(info.max_retries, 3);
        assert!(info.langchain_support);
        assert!(!groq().get_provider_info().langchain_support);
    }

    #[test]
    fn test_provider_info_serializes_six_keys() {
        let value = serde_json::to_value(groq().get_provider_info()).unwrap();

        assert_eq!(
            value,
            json!({
                "provider": "groq",
                "model": "llama3-8b-8192",
                "base_url": "https://api.groq.com/openai/v1",
                "timeout": 60,
                "max_retries": 3,
                "langchain_support": false
            })
        );
    }

    #[test]
    fn test_azure_info_reports_registry_base_url() {
        let env = HashMap::from([
            ("AZURE_OPENAI_API_KEY", "k"),
            ("AZURE_OPENAI_ENDPOINT", "https://res.openai.azure.com"),
            ("AZURE_OPENAI_DEPLOYMENT", "dep"),
        ]);

        let llm =
            LlmWrapper::create(ProviderRegistry::builtin(), "azure_openai", None, &env).unwrap();

        assert_eq!(llm.get_provider_info().base_url, "https://openai.azure.com");
        assert_eq!(AZURE_DEFAULT_API_VERSION, "2024-06-01");
    }

    #[test]
    fn test_retry_policy_follows_transport_path() {
        let env = HashMap::from([("OPENAI_API_KEY", "sk")]);
        let openai = LlmWrapper::create(ProviderRegistry::builtin(), "openai", None, &env).unwrap();

        assert_eq!(openai.retry_policy().max_attempts, 4);
        assert_eq!(groq().retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_with_retry_policy_replaces_policy() {
        let policy = RetryPolicy {
            max_attempts: 2,
            initial_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        };

        let llm = groq().with_retry_policy(policy.clone()).unwrap();

        assert_eq!(llm.retry_policy(), &policy);
    }

    #[test]
    fn test_list_providers_uses_builtin_order() {
        let providers = LlmWrapper::list_providers();

        assert_eq!(providers.len(), 7);
        assert_eq!(providers[0], "openai");
        assert!(providers.contains(&"llama_qwen"));
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_input_before_network() {
        // The builtin groq URL is never contacted: validation fails first.
        let llm = groq();

        let string_input = llm.chat(json!("hello"), None).await;
        let object_input = llm
            .chat(json!({"role": "user", "content": "hi"}), None)
            .await;
        let empty_input = llm.chat(Vec::<Message>::new(), Some(ChatOptions::new())).await;

        assert!(matches!(string_input, Err(LlmError::InvalidMessageFormat { .. })));
        assert!(matches!(object_input, Err(LlmError::InvalidMessageFormat { .. })));
        assert!(matches!(empty_input, Err(LlmError::InvalidMessageFormat { .. })));
    }

    #[tokio::test]
    async fn test_list_models_unknown_provider_is_error() {
        let env: HashMap<&str, &str> = HashMap::new();

        let result = LlmWrapper::list_models_in(ProviderRegistry::builtin(), "cohere", &env).await;

        assert!(matches!(result, Err(LlmError::UnsupportedProvider { .. })));
    }

    #[tokio::test]
    async fn test_list_models_without_credentials_is_empty() {
        let env: HashMap<&str, &str> = HashMap::new();

        let models = LlmWrapper::list_models_in(ProviderRegistry::builtin(), "openai", &env)
            .await
            .unwrap();

        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn test_list_models_without_listing_support_is_empty() {
        let mut config = ProviderRegistry::builtin()
            .lookup("llama_qwen")
            .unwrap()
            .clone();
        config.supports_model_listing = false;
        let registry = ProviderRegistry::new(vec![config]).unwrap();
        let env: HashMap<&str, &str> = HashMap::new();

        let models = LlmWrapper::list_models_in(&registry, "llama_qwen", &env)
            .await
            .unwrap();

        assert!(models.is_empty());
    }
}
