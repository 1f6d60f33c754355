//! Error types for LLM operations.
//!
//! This module provides structured error handling for llm-wrapper operations,
//! including categorization, severity levels, and retry guidance.
//!
//! # Error Types
//!
//! The main error type is [`LlmError`], which covers all failure modes:
//! - Unknown provider identifiers
//! - Missing credentials in the environment
//! - Malformed caller-supplied message sequences
//! - Failed calls to the remote provider (network, auth, rate limit, vendor errors)
//!
//! Several error messages are matched on by callers. The phrases
//! `not supported`, `Available:` and `API key` must stay in the rendered text.
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use llm_wrapper::LlmError;
//!
//! fn handle_error(err: LlmError) {
//!     if err.is_retryable() {
//!         println!("Retryable error: {}", err);
//!     }
//!
//!     if let Some(status) = err.status_code() {
//!         println!("Vendor answered with HTTP {status}");
//!     }
//!
//!     println!("Tell user: {}", err.user_message());
//! }
//! ```

use crate::logging::{log_error, log_warn};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
///
/// Use [`LlmError::category()`] to get the category for any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// External service failures (LLM providers, network issues).
    ///
    /// The LLM provider or network had an issue. May indicate a
    /// provider outage.
    External,

    /// Client errors (invalid input, authentication, configuration).
    ///
    /// The caller made a mistake that they can fix (unknown provider,
    /// missing API key, malformed messages).
    Client,

    /// Temporary failures that may succeed when retried.
    ///
    /// Rate limits, timeouts and dropped connections.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,

    /// Expected failure caused by caller input.
    Info,
}

/// What went wrong during a call to the remote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallFailureKind {
    /// Connection could not be established or was dropped.
    Network,
    /// The attempt exceeded the provider's configured timeout.
    Timeout,
    /// The provider rejected the credentials (HTTP 401/403).
    Authentication,
    /// The provider is throttling requests (HTTP 429).
    RateLimited {
        /// Wait time advertised by the provider, or a default.
        retry_after_seconds: u64,
    },
    /// Any other non-success status returned by the provider.
    Vendor,
    /// The provider answered but the body could not be decoded.
    InvalidResponse,
}

impl fmt::Display for CallFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailureKind::Network => write!(f, "network error"),
            CallFailureKind::Timeout => write!(f, "timed out"),
            CallFailureKind::Authentication => write!(f, "authentication failed"),
            CallFailureKind::RateLimited {
                retry_after_seconds,
            } => write!(f, "rate limited, retry after {retry_after_seconds}s"),
            CallFailureKind::Vendor => write!(f, "vendor error"),
            CallFailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

// ============================================================================
// LLM Error types
// ============================================================================

/// Convenient result type for LLM operations.
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Errors that can occur during LLM operations.
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `UnsupportedProvider` | Client | No |
/// | `MissingCredentials` | Client | No |
/// | `InvalidMessageFormat` | Client | No |
/// | `ConfigurationError` | Client | No |
/// | `LlmCall` (network, timeout, 429, 5xx) | Transient | Yes |
/// | `LlmCall` (auth, other vendor errors) | Client / External | No |
#[derive(Error, Debug)]
pub enum LlmError {
    /// The requested provider identifier is not registered.
    ///
    /// Lookups are case-sensitive: `"OpenAI"` is rejected even though
    /// `"openai"` is valid.
    #[error("Provider '{provider}' not supported. Available: {}", .available.join(", "))]
    UnsupportedProvider {
        /// The provider name that was requested.
        provider: String,
        /// Every registered identifier, in registry order.
        available: Vec<String>,
    },

    /// Required credential variables are absent from the environment.
    #[error(
        "API key not configured for provider '{provider}': set {}",
        .variables.join(", ")
    )]
    MissingCredentials {
        /// The provider that could not be configured.
        provider: String,
        /// The environment variables that were missing.
        variables: Vec<String>,
    },

    /// The caller passed something that is not an ordered sequence of
    /// role/content messages.
    #[error("Invalid message format: {message}")]
    InvalidMessageFormat {
        /// What was wrong with the input.
        message: String,
    },

    /// The call to the remote provider failed.
    #[error("LLM call to '{provider}' failed{}: {message}", status_suffix(.status))]
    LlmCall {
        /// Provider identifier the call was made against.
        provider: String,
        /// HTTP status returned by the vendor, when one was received.
        status: Option<u16>,
        /// Classification of the failure.
        kind: CallFailureKind,
        /// Vendor error message, or a description of the transport failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Registry, settings or credential values are malformed.
    #[error("Provider configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" with status {code}"))
        .unwrap_or_default()
}

impl LlmError {
    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedProvider { .. } => ErrorCategory::Client,
            Self::MissingCredentials { .. } => ErrorCategory::Client,
            Self::InvalidMessageFormat { .. } => ErrorCategory::Client,
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::LlmCall { .. } if self.is_retryable() => ErrorCategory::Transient,
            Self::LlmCall {
                kind: CallFailureKind::Authentication,
                ..
            } => ErrorCategory::Client,
            Self::LlmCall { .. } => ErrorCategory::External,
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedProvider { .. } => ErrorSeverity::Error,
            Self::MissingCredentials { .. } => ErrorSeverity::Error,
            Self::InvalidMessageFormat { .. } => ErrorSeverity::Info,
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::LlmCall { .. } if self.is_retryable() => ErrorSeverity::Warning,
            Self::LlmCall { .. } => ErrorSeverity::Error,
        }
    }

    /// Whether a caller may reasonably retry the same request.
    ///
    /// Returns `true` for network failures, timeouts, rate limits and
    /// vendor-side 5xx responses. The wrapper itself never retries beyond
    /// what the transport path already does.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::LlmCall { kind, status, .. } => match kind {
                CallFailureKind::Network
                | CallFailureKind::Timeout
                | CallFailureKind::RateLimited { .. } => true,
                CallFailureKind::Vendor => status.is_some_and(|code| code >= 500),
                CallFailureKind::Authentication | CallFailureKind::InvalidResponse => false,
            },
            _ => false,
        }
    }

    /// HTTP status reported by the vendor, when the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::LlmCall { status, .. } => *status,
            _ => None,
        }
    }

    /// Failure classification for `LlmCall` errors.
    pub fn call_failure_kind(&self) -> Option<CallFailureKind> {
        match self {
            Self::LlmCall { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Convert to a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedProvider { .. } => {
                "The requested AI provider is not supported".to_string()
            }
            Self::MissingCredentials { .. } => {
                "AI service API key is not configured. Please check your settings".to_string()
            }
            Self::InvalidMessageFormat { .. } => {
                "The conversation could not be sent because it is malformed".to_string()
            }
            Self::ConfigurationError { .. } => {
                "AI service configuration issue. Please check your settings".to_string()
            }
            Self::LlmCall { kind, .. } => match kind {
                CallFailureKind::RateLimited {
                    retry_after_seconds,
                } => format!(
                    "Service is busy. Please wait {retry_after_seconds} seconds and try again"
                ),
                CallFailureKind::Timeout => "Request timed out. Please try again".to_string(),
                CallFailureKind::Authentication => {
                    "Authentication failed. Please check your credentials".to_string()
                }
                CallFailureKind::InvalidResponse => {
                    "Received an invalid response from AI service".to_string()
                }
                CallFailureKind::Network | CallFailureKind::Vendor => {
                    "Unable to communicate with AI service. Please try again".to_string()
                }
            },
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    /// Create an unsupported provider error (logs at ERROR level).
    pub fn unsupported_provider<I, S>(provider: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = provider.into();
        let available: Vec<String> = available.into_iter().map(Into::into).collect();
        log_error!(
            provider = %provider,
            available = ?available,
            error_type = "unsupported_provider",
            "Unsupported LLM provider requested"
        );
        Self::UnsupportedProvider {
            provider,
            available,
        }
    }

    /// Create a missing credentials error (logs at ERROR level).
    pub fn missing_credentials<I, S>(provider: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = provider.into();
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        log_error!(
            provider = %provider,
            missing = ?variables,
            error_type = "missing_credentials",
            "Provider credentials not found in environment"
        );
        Self::MissingCredentials {
            provider,
            variables,
        }
    }

    pub fn invalid_message_format(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "invalid_message_format",
            detail = %message,
            "Rejected malformed message sequence"
        );
        Self::InvalidMessageFormat { message }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            detail = %message,
            "LLM configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    /// Create a failed-call error. Transient failures log at WARN, the rest at ERROR.
    pub fn llm_call(
        provider: impl Into<String>,
        kind: CallFailureKind,
        status: Option<u16>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let err = Self::LlmCall {
            provider: provider.into(),
            status,
            kind,
            message: message.into(),
            source,
        };
        if let Self::LlmCall {
            provider,
            status,
            kind,
            message,
            source,
        } = &err
        {
            if err.is_retryable() {
                log_warn!(
                    provider = %provider,
                    status = ?status,
                    kind = %kind,
                    detail = %message,
                    error_type = "llm_call",
                    "LLM provider call failed (retryable)"
                );
            } else {
                log_error!(
                    provider = %provider,
                    status = ?status,
                    kind = %kind,
                    detail = %message,
                    has_source = source.is_some(),
                    error_type = "llm_call",
                    "LLM provider call failed"
                );
            }
        }
        err
    }
}
