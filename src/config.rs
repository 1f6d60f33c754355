//! Provider registry and process-wide settings.
//!
//! The registry is an immutable table built once per process. Facades borrow
//! entries from it and never copy-and-mutate them.

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};
use once_cell::sync::{Lazy, OnceCell};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Default API version sent to Azure OpenAI when `AZURE_OPENAI_API_VERSION` is unset.
pub const AZURE_DEFAULT_API_VERSION: &str = "2024-06-01";

/// Source of environment-style key/value settings.
///
/// Empty or whitespace-only values are treated as absent.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

impl<K, V> EnvSource for HashMap<K, V>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
{
    fn var(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.as_ref().to_string())
            .filter(|v| !v.trim().is_empty())
    }
}

/// How credentials are attached to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// Key sent verbatim in a vendor-specific header.
    ApiKeyHeader { header: &'static str },
    /// Azure OpenAI: `api-key` header plus endpoint/deployment routing.
    AzureDeployment,
    /// No credentials (local endpoints).
    None,
}

/// Wire dialect spoken by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    /// OpenAI chat completions (also Azure, Groq, Fireworks, local servers)
    OpenAiChat,
    /// Anthropic Messages API
    AnthropicMessages,
    /// Google Gemini generateContent
    GeminiGenerateContent,
}

/// Where system messages go when a conversation is adapted for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPrompt {
    /// Sent in place with the `system` role.
    Inline,
    /// Lifted into a top-level request field (Anthropic `system`).
    TopLevelField,
    /// Lifted into Gemini's `systemInstruction`.
    Instruction,
    /// Prepended to the first user turn; the vendor rejects system roles.
    FoldIntoFirstUser,
}

/// Connection parameters for one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Unique lowercase key, e.g. `"openai"`.
    pub identifier: String,
    pub base_url: String,
    pub default_model: String,
    /// Per-attempt timeout enforced by the transport.
    pub timeout_seconds: u64,
    /// Retries the transport may perform after the first attempt.
    pub max_retries: u32,
    pub auth_scheme: AuthScheme,
    /// Whether the provider is driven through a higher-level adapter library
    /// (retries owned by the transport) rather than single-shot raw HTTP.
    pub uses_adapter_library: bool,
    /// Environment variables that must be present for live calls, in order.
    pub requires_env_vars: Vec<&'static str>,
    pub api_format: ApiFormat,
    pub system_prompt: SystemPrompt,
    pub supports_model_listing: bool,
}

impl ProviderConfig {
    /// Validate the configuration is well-formed
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if the base URL or default
    /// model is empty, or the timeout is zero.
    pub fn validate(&self) -> LlmResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(LlmError::configuration_error(format!(
                "{}: base URL is required",
                self.identifier
            )));
        }
        if self.default_model.trim().is_empty() {
            return Err(LlmError::configuration_error(format!(
                "{}: default model is required",
                self.identifier
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(LlmError::configuration_error(format!(
                "{}: timeout must be positive",
                self.identifier
            )));
        }
        Ok(())
    }

    /// Copy of this config pointed at another base URL.
    ///
    /// Used to build custom registries (proxies, mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Immutable table of provider configurations.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

static BUILTIN_REGISTRY: Lazy<ProviderRegistry> = Lazy::new(|| {
    let registry = ProviderRegistry {
        providers: builtin_providers(),
    };
    log_debug!(
        providers = ?registry.list_providers(),
        "Built-in provider registry initialized"
    );
    registry
});

impl ProviderRegistry {
    /// Build a custom registry.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if an identifier is empty,
    /// not lowercase, or registered twice.
    pub fn new(providers: Vec<ProviderConfig>) -> LlmResult<Self> {
        for (index, provider) in providers.iter().enumerate() {
            let id = &provider.identifier;
            if id.is_empty() || *id != id.to_lowercase() {
                return Err(LlmError::configuration_error(format!(
                    "Provider identifier '{id}' must be a non-empty lowercase string"
                )));
            }
            if providers[..index].iter().any(|p| &p.identifier == id) {
                return Err(LlmError::configuration_error(format!(
                    "Provider identifier '{id}' is registered more than once"
                )));
            }
        }
        Ok(Self { providers })
    }

    /// The process-wide table of supported providers.
    pub fn builtin() -> &'static ProviderRegistry {
        &BUILTIN_REGISTRY
    }

    /// Find a provider by exact, case-sensitive identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnsupportedProvider`] listing every valid identifier.
    pub fn lookup(&self, identifier: &str) -> LlmResult<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.identifier == identifier)
            .ok_or_else(|| LlmError::unsupported_provider(identifier, self.list_providers()))
    }

    /// Registered identifiers in registration order.
    pub fn list_providers(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.identifier.as_str())
            .collect()
    }

    /// Run [`ProviderConfig::validate`] over every entry.
    pub fn validate_all(&self) -> BTreeMap<String, bool> {
        self.providers
            .iter()
            .map(|p| (p.identifier.clone(), p.validate().is_ok()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }
}

fn builtin_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            identifier: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::Bearer,
            uses_adapter_library: true,
            requires_env_vars: vec!["OPENAI_API_KEY"],
            api_format: ApiFormat::OpenAiChat,
            system_prompt: SystemPrompt::Inline,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "anthropic".to_string(),
            base_url: "https://api.anthropic.com/v1".to_string(),
            default_model: "claude-3-opus-20240229".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::ApiKeyHeader {
                header: "x-api-key",
            },
            uses_adapter_library: true,
            requires_env_vars: vec!["ANTHROPIC_API_KEY"],
            api_format: ApiFormat::AnthropicMessages,
            system_prompt: SystemPrompt::TopLevelField,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "groq".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            default_model: "llama3-8b-8192".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::Bearer,
            uses_adapter_library: false,
            requires_env_vars: vec!["GROQ_API_KEY"],
            api_format: ApiFormat::OpenAiChat,
            system_prompt: SystemPrompt::Inline,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "fireworks".to_string(),
            base_url: "https://api.fireworks.ai/inference/v1".to_string(),
            default_model: "accounts/fireworks/models/llama-v3p1-8b-instruct".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::Bearer,
            uses_adapter_library: false,
            requires_env_vars: vec!["FIREWORKS_API_KEY"],
            api_format: ApiFormat::OpenAiChat,
            system_prompt: SystemPrompt::Inline,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "gemini".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            default_model: "gemini-1.5-flash".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::ApiKeyHeader {
                header: "x-goog-api-key",
            },
            uses_adapter_library: true,
            requires_env_vars: vec!["GOOGLE_API_KEY"],
            api_format: ApiFormat::GeminiGenerateContent,
            system_prompt: SystemPrompt::Instruction,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "azure_openai".to_string(),
            // Replaced per call by AZURE_OPENAI_ENDPOINT
            base_url: "https://openai.azure.com".to_string(),
            default_model: "gpt-4o".to_string(),
            timeout_seconds: 60,
            max_retries: 3,
            auth_scheme: AuthScheme::AzureDeployment,
            uses_adapter_library: true,
            requires_env_vars: vec![
                "AZURE_OPENAI_API_KEY",
                "AZURE_OPENAI_ENDPOINT",
                "AZURE_OPENAI_DEPLOYMENT",
            ],
            api_format: ApiFormat::OpenAiChat,
            system_prompt: SystemPrompt::Inline,
            supports_model_listing: true,
        },
        ProviderConfig {
            identifier: "llama_qwen".to_string(),
            base_url: "http://localhost:8000/v1".to_string(),
            default_model: "qwen2.5-7b-instruct".to_string(),
            timeout_seconds: 120,
            max_retries: 1,
            auth_scheme: AuthScheme::None,
            uses_adapter_library: false,
            requires_env_vars: Vec::new(),
            api_format: ApiFormat::OpenAiChat,
            system_prompt: SystemPrompt::FoldIntoFirstUser,
            supports_model_listing: true,
        },
    ]
}

// ============================================================================
// Global settings
// ============================================================================

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl DeploymentEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentEnvironment::Development => "development",
            DeploymentEnvironment::Staging => "staging",
            DeploymentEnvironment::Production => "production",
        }
    }
}

impl fmt::Display for DeploymentEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentEnvironment {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(LlmError::configuration_error(format!(
                "Unknown environment '{other}', expected development, staging or production"
            ))),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub service_name: String,
    pub environment: DeploymentEnvironment,
    pub metrics_enabled: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            service_name: "llm-wrapper".to_string(),
            environment: DeploymentEnvironment::Development,
            metrics_enabled: false,
        }
    }
}

static GLOBAL_SETTINGS: OnceCell<GlobalSettings> = OnceCell::new();

impl GlobalSettings {
    /// Parse settings from `SERVICE_NAME`, `ENVIRONMENT` and `PROMETHEUS_ENABLED`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] for an unknown environment
    /// name or a metrics flag that is not a boolean.
    pub fn from_source(env: &impl EnvSource) -> LlmResult<Self> {
        let defaults = Self::default();

        let service_name = env.var("SERVICE_NAME").unwrap_or(defaults.service_name);
        let environment = match env.var("ENVIRONMENT") {
            Some(value) => value.parse()?,
            None => defaults.environment,
        };
        let metrics_enabled = match env.var("PROMETHEUS_ENABLED") {
            Some(value) => parse_flag(&value)?,
            None => defaults.metrics_enabled,
        };

        Ok(Self {
            service_name,
            environment,
            metrics_enabled,
        })
    }
}

fn parse_flag(value: &str) -> LlmResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(LlmError::configuration_error(format!(
            "PROMETHEUS_ENABLED must be a boolean, got '{other}'"
        ))),
    }
}

/// Settings for this process, loaded from the environment on first access.
///
/// Malformed values fall back to defaults with a warning; there is no setter.
pub fn global_settings() -> &'static GlobalSettings {
    GLOBAL_SETTINGS.get_or_init(|| {
        GlobalSettings::from_source(&ProcessEnv).unwrap_or_else(|e| {
            log_warn!(error = %e, "Invalid global settings in environment, using defaults");
            GlobalSettings::default()
        })
    })
}
