//! Anthropic Claude dialect
//!
//! Uses Anthropic's native Messages API format.
//!
//! ## Module Organization
//!
//! - `types`: Request/response structures for Anthropic API
//! - `conversion`: Message conversion between unified and Anthropic formats

pub(crate) mod conversion;
pub(crate) mod types;

#[cfg(test)]
mod tests;
