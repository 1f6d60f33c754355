//! Tests for the Anthropic dialect
//!
//! HTTP behaviour is covered in tests/anthropic_integration_tests.rs.
