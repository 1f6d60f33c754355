//! # llm-wrapper
//!
//! Unified LLM client over OpenAI, Azure OpenAI, Anthropic, Groq, Fireworks,
//! Gemini and a local OpenAI-compatible llama/qwen endpoint.
//!
//! ## Key Features
//!
//! - **One facade**: pick a provider and model by name, get one response shape
//! - **Immutable registry**: provider defaults live in a static table
//! - **Per-vendor folding**: system prompts are adapted to each wire format
//! - **Resilience**: timeouts on every attempt, backoff retries on adapter providers
//!
//! ## Example
//!
//! ```rust,no_run
//! use llm_wrapper::{ChatOptions, LlmWrapper, Message};
//!
//! # async fn example() -> llm_wrapper::LlmResult<()> {
//! let llm = LlmWrapper::new("groq", None)?;
//! let messages = vec![
//!     Message::system("You are terse."),
//!     Message::user("Name one prime number."),
//! ];
//! let response = llm
//!     .chat(messages, Some(ChatOptions::new().temperature(0.2)))
//!     .await?;
//! println!("{}", response.message);
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub(crate) mod internals;
pub(crate) mod providers;

pub use internals::retry;

#[cfg(test)]
mod tests;

pub use client::LlmWrapper;
pub use config::{
    global_settings, ApiFormat, AuthScheme, DeploymentEnvironment, EnvSource, GlobalSettings,
    ProcessEnv, ProviderConfig, ProviderRegistry, SystemPrompt,
};
pub use core_types::{
    ChatOptions, IntoMessages, Message, MessageRole, NormalizedResponse, ProviderInfo, TokenUsage,
};
pub use credentials::Credentials;
pub use error::{CallFailureKind, ErrorCategory, ErrorSeverity, LlmError, LlmResult};
pub use retry::RetryPolicy;
