//! Logging utilities for llm-wrapper
//!
//! Re-exports tracing macros with log_* naming convention so provider,
//! registry and transport code share one vocabulary.

#[allow(unused_imports)]
pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};
