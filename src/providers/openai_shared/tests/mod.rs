//! Tests for the OpenAI-compatible dialect
//!
//! Shared by openai, azure_openai, groq, fireworks and llama_qwen.
