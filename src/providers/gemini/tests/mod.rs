//! Tests for the Gemini dialect
