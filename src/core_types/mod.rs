//! Core types for the unified LLM facade
//!
//! ## Organization
//! - `messages` - Provider-agnostic conversation turns and input validation
//! - `chat` - Call options, the normalized response and provider info

pub mod chat;
pub mod messages;

// Re-export commonly used types
pub use chat::{ChatOptions, NormalizedResponse, ProviderInfo, TokenUsage};
pub use messages::{IntoMessages, Message, MessageRole};
