//! Provider Dispatch Tests
//!
//! UNIT UNDER TEST: fold_system_into_first_user, build_request,
//! request_headers, normalize_response, classify_status, vendor_error_message
//!
//! BUSINESS RESPONSIBILITY:
//!   - Pick the wire dialect from the registry entry
//!   - Never drop system text on endpoints without a system role
//!   - Turn undecodable vendor bodies into call failures
//!   - Map HTTP statuses onto failure kinds
//!
//! Dialect-specific conversion tests live next to each dialect. HTTP
//! behaviour against mock servers lives in the crate's tests/ directory.

use super::http::{classify_status, vendor_error_message};
use super::{build_request, fold_system_into_first_user, normalize_response, request_headers};
use crate::config::ProviderRegistry;
use crate::core_types::{ChatOptions, Message, MessageRole};
use crate::credentials::Credentials;
use crate::error::{CallFailureKind, LlmError};
use reqwest::StatusCode;

fn turns(messages: &[Message]) -> Vec<(MessageRole, &str)> {
    messages.iter().map(|m| (m.role, m.content.as_str())).collect()
}

#[test]
fn test_fold_prepends_system_to_first_user() {
    let folded = fold_system_into_first_user(&[
        Message::system("S1"),
        Message::system("S2"),
        Message::user("U1"),
        Message::assistant("A1"),
        Message::user("U2"),
    ]);

    assert_eq!(
        turns(&folded),
        vec![
            (MessageRole::User, "S1\n\nS2\n\nU1"),
            (MessageRole::Assistant, "A1"),
            (MessageRole::User, "U2"),
        ]
    );
}

#[test]
fn test_fold_inserts_user_turn_before_leading_assistant() {
    let folded = fold_system_into_first_user(&[
        Message::system("S"),
        Message::assistant("A"),
        Message::user("U"),
    ]);

    assert_eq!(
        turns(&folded),
        vec![
            (MessageRole::User, "S"),
            (MessageRole::Assistant, "A"),
            (MessageRole::User, "U"),
        ]
    );
}

#[test]
fn test_fold_keeps_trailing_system_text() {
    let folded = fold_system_into_first_user(&[Message::user("U"), Message::system("late")]);

    assert_eq!(
        turns(&folded),
        vec![(MessageRole::User, "U"), (MessageRole::User, "late")]
    );
}

#[test]
fn test_fold_without_system_is_identity() {
    let messages = vec![Message::user("U"), Message::assistant("A")];
    assert_eq!(fold_system_into_first_user(&messages), messages);
}

#[test]
fn test_build_request_dispatches_on_api_format() {
    // Arrange
    let registry = ProviderRegistry::builtin();
    let messages = [Message::system("S"), Message::user("U")];
    let options = ChatOptions::default();
    let key = Credentials::ApiKeyHeader {
        header: "x-api-key",
        api_key: "k".to_string(),
    };

    // Act
    let anthropic = build_request(
        registry.lookup("anthropic").unwrap(),
        &key,
        "claude-3-opus-20240229",
        &messages,
        &options,
    )
    .unwrap();
    let openai = build_request(
        registry.lookup("openai").unwrap(),
        &Credentials::Bearer {
            api_key: "k".to_string(),
        },
        "gpt-4o-mini",
        &messages,
        &options,
    )
    .unwrap();

    // Assert
    assert_eq!(anthropic.url, "https://api.anthropic.com/v1/messages");
    assert_eq!(anthropic.body["system"], "S");
    assert_eq!(anthropic.body["max_tokens"], 1024);
    assert_eq!(openai.url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(openai.body["messages"][0]["role"], "system");
}

#[test]
fn test_anthropic_headers_carry_api_version() {
    let config = ProviderRegistry::builtin().lookup("anthropic").unwrap();
    let credentials = Credentials::ApiKeyHeader {
        header: "x-api-key",
        api_key: "secret".to_string(),
    };

    let headers = request_headers(config, &credentials).unwrap();

    assert_eq!(headers.get("x-api-key").unwrap(), "secret");
    assert_eq!(headers.get("anthropic-version").unwrap(), "2023-06-01");
    assert_eq!(headers.get("content-type").unwrap(), "application/json");
}

#[test]
fn test_undecodable_body_is_invalid_response() {
    let config = ProviderRegistry::builtin().lookup("groq").unwrap();

    let err = normalize_response(config, "<html>bad gateway</html>").unwrap_err();

    match err {
        LlmError::LlmCall { provider, kind, .. } => {
            assert_eq!(provider, "groq");
            assert_eq!(kind, CallFailureKind::InvalidResponse);
        }
        other => panic!("expected LlmCall, got {other:?}"),
    }
}

#[test]
fn test_classify_status() {
    assert_eq!(
        classify_status(StatusCode::UNAUTHORIZED, None),
        CallFailureKind::Authentication
    );
    assert_eq!(
        classify_status(StatusCode::FORBIDDEN, None),
        CallFailureKind::Authentication
    );
    assert_eq!(
        classify_status(StatusCode::TOO_MANY_REQUESTS, Some(7)),
        CallFailureKind::RateLimited {
            retry_after_seconds: 7
        }
    );
    assert_eq!(
        classify_status(StatusCode::TOO_MANY_REQUESTS, None),
        CallFailureKind::RateLimited {
            retry_after_seconds: 60
        }
    );
    assert_eq!(
        classify_status(StatusCode::REQUEST_TIMEOUT, None),
        CallFailureKind::Timeout
    );
    assert_eq!(
        classify_status(StatusCode::BAD_GATEWAY, None),
        CallFailureKind::Vendor
    );
}

#[test]
fn test_vendor_error_message_extraction() {
    assert_eq!(
        vendor_error_message(r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#),
        "Invalid API key"
    );
    assert_eq!(vendor_error_message(r#"{"error": "model not loaded"}"#), "model not loaded");
    assert_eq!(vendor_error_message(r#"{"detail": "Not Found"}"#), "Not Found");
    assert_eq!(vendor_error_message("  upstream timeout \n"), "upstream timeout");
    assert_eq!(vendor_error_message(""), "empty error body");
}
