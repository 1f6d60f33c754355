//! Shared OpenAI-compatible API structures and conversion
//!
//! OpenAI, Azure OpenAI, Groq, Fireworks and the local llama/qwen endpoint
//! all speak this dialect; they differ only in URL routing, auth headers and
//! system-message handling.
//!
//! - `types` - Wire structures
//! - `conversion` - Request building, URL routing and response normalization

pub mod conversion;
pub mod types;

#[cfg(test)]
mod tests;
