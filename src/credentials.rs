//! Credential resolution per auth scheme.

use crate::config::{AuthScheme, EnvSource, ProviderConfig, AZURE_DEFAULT_API_VERSION};
use crate::error::{LlmError, LlmResult};
use crate::logging::log_debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Credentials resolved for one provider at construction time.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer {
        api_key: String,
    },
    ApiKeyHeader {
        header: &'static str,
        api_key: String,
    },
    Azure {
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
    },
    None,
}

// Keys stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer { .. } => f.write_str("Credentials::Bearer { .. }"),
            Credentials::ApiKeyHeader { header, .. } => f
                .debug_struct("Credentials::ApiKeyHeader")
                .field("header", header)
                .finish_non_exhaustive(),
            Credentials::Azure {
                endpoint,
                deployment,
                api_version,
                ..
            } => f
                .debug_struct("Credentials::Azure")
                .field("endpoint", endpoint)
                .field("deployment", deployment)
                .field("api_version", api_version)
                .finish_non_exhaustive(),
            Credentials::None => f.write_str("Credentials::None"),
        }
    }
}

impl Credentials {
    /// Read the variables `config` requires from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredentials`] naming every absent variable.
    pub fn resolve(config: &ProviderConfig, env: &impl EnvSource) -> LlmResult<Self> {
        let missing: Vec<&str> = config
            .requires_env_vars
            .iter()
            .copied()
            .filter(|name| env.var(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(LlmError::missing_credentials(&config.identifier, missing));
        }

        let required = |index: usize| -> LlmResult<String> {
            config
                .requires_env_vars
                .get(index)
                .and_then(|name| env.var(name))
                .ok_or_else(|| {
                    LlmError::configuration_error(format!(
                        "{}: auth scheme {:?} needs at least {} environment variable(s)",
                        config.identifier,
                        config.auth_scheme,
                        index + 1
                    ))
                })
        };

        let credentials = match config.auth_scheme {
            AuthScheme::Bearer => Credentials::Bearer {
                api_key: required(0)?,
            },
            AuthScheme::ApiKeyHeader { header } => Credentials::ApiKeyHeader {
                header,
                api_key: required(0)?,
            },
            AuthScheme::AzureDeployment => Credentials::Azure {
                api_key: required(0)?,
                endpoint: required(1)?.trim_end_matches('/').to_string(),
                deployment: required(2)?,
                api_version: env
                    .var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| AZURE_DEFAULT_API_VERSION.to_string()),
            },
            AuthScheme::None => Credentials::None,
        };

        log_debug!(
            provider = %config.identifier,
            credentials = ?credentials,
            "Resolved provider credentials"
        );

        Ok(credentials)
    }

    /// Headers for a JSON request carrying these credentials.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigurationError`] if a key contains bytes that
    /// are not valid in an HTTP header.
    pub fn headers(&self) -> LlmResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self {
            Credentials::Bearer { api_key } => {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
            }
            Credentials::ApiKeyHeader { header, api_key } => {
                let name = HeaderName::from_bytes(header.as_bytes()).map_err(|e| {
                    LlmError::configuration_error(format!("Invalid auth header name '{header}': {e}"))
                })?;
                headers.insert(name, header_value(api_key)?);
            }
            Credentials::Azure { api_key, .. } => {
                headers.insert(HeaderName::from_static("api-key"), header_value(api_key)?);
            }
            Credentials::None => {}
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> LlmResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| LlmError::configuration_error(format!("Invalid API key format: {e}")))
}
