//! Internal utilities for llm-wrapper
//!
//! This module contains implementation details that are not part of the public API.
//! `RetryPolicy` is re-exported through `lib.rs`.

pub mod retry;
