//! Provider-agnostic chat messages
//!
//! Callers build conversations from [`Message`] values and resend the full
//! history every turn; order is preserved through every provider adaptation.

use crate::error::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Message roles for LLM interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(LlmError::invalid_message_format(format!(
                "unknown role '{other}', expected system, user or assistant"
            ))),
        }
    }
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Inputs accepted by [`LlmWrapper::chat`](crate::LlmWrapper::chat).
///
/// Typed message collections convert directly. Untyped JSON is checked for
/// the `[{"role": ..., "content": ...}, ...]` shape; anything else (a bare
/// string, an object, a number) is rejected with
/// [`LlmError::InvalidMessageFormat`] before any request is built.
pub trait IntoMessages {
    fn into_messages(self) -> LlmResult<Vec<Message>>;
}

fn non_empty(messages: Vec<Message>) -> LlmResult<Vec<Message>> {
    if messages.is_empty() {
        return Err(LlmError::invalid_message_format(
            "message sequence is empty",
        ));
    }
    Ok(messages)
}

impl IntoMessages for Vec<Message> {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        non_empty(self)
    }
}

impl IntoMessages for &Vec<Message> {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        non_empty(self.clone())
    }
}

impl IntoMessages for &[Message] {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        non_empty(self.to_vec())
    }
}

impl<const N: usize> IntoMessages for [Message; N] {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        non_empty(self.into())
    }
}

impl IntoMessages for serde_json::Value {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        (&self).into_messages()
    }
}

impl IntoMessages for &serde_json::Value {
    fn into_messages(self) -> LlmResult<Vec<Message>> {
        let items = self.as_array().ok_or_else(|| {
            LlmError::invalid_message_format(format!(
                "expected an array of {{role, content}} objects, got {}",
                json_kind(self)
            ))
        })?;

        let messages = items
            .iter()
            .enumerate()
            .map(|(index, item)| message_from_json(index, item))
            .collect::<LlmResult<Vec<_>>>()?;

        non_empty(messages)
    }
}

fn message_from_json(index: usize, item: &serde_json::Value) -> LlmResult<Message> {
    let object = item.as_object().ok_or_else(|| {
        LlmError::invalid_message_format(format!(
            "message {index} must be an object, got {}",
            json_kind(item)
        ))
    })?;

    let role = object
        .get("role")
        .and_then(|r| r.as_str())
        .ok_or_else(|| {
            LlmError::invalid_message_format(format!("message {index} has no string 'role'"))
        })?
        .parse::<MessageRole>()?;

    let content = object
        .get("content")
        .and_then(|c| c.as_str())
        .ok_or_else(|| {
            LlmError::invalid_message_format(format!("message {index} has no string 'content'"))
        })?;

    Ok(Message::new(role, content))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
