//! Wire types for the Bedrock Anthropic messages protocol.

use serde::{Deserialize, Serialize};

use crate::error::InvokeError;

/// Protocol version tag required by Bedrock-hosted Anthropic models.
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

/// Model used when no override is configured.
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Region used when no override is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Message author role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message authored by the caller.
    User,
    /// Message authored by the model.
    Assistant,
}

/// One turn in the conversation sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// JSON request body for the messages protocol.
///
/// Field names are the wire names expected by the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesBody {
    /// Maximum number of tokens the model may generate.
    pub max_tokens: u32,
    /// Conversation turns, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Fixed protocol version tag ([`ANTHROPIC_VERSION`]).
    pub anthropic_version: String,
}

/// A complete model invocation: the target model plus the serialized body.
///
/// The model identifier travels out of band (it selects the endpoint path),
/// so it is not part of the JSON body.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    /// Identifier of the model to invoke.
    pub model_id: String,
    /// Request body, serialized as JSON by the transport.
    pub body: MessagesBody,
}

impl InvokeRequest {
    /// Builds the single-user-message request used for one-shot prompts.
    #[must_use]
    pub fn user_message(model_id: impl Into<String>, prompt: &str, max_tokens: u32) -> Self {
        Self {
            model_id: model_id.into(),
            body: MessagesBody {
                max_tokens,
                messages: vec![ChatMessage::user(prompt)],
                anthropic_version: ANTHROPIC_VERSION.to_string(),
            },
        }
    }
}

/// Response envelope returned by the messages protocol.
///
/// A missing or empty `content` list decodes successfully; whether that is
/// acceptable is the caller's decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeResponse {
    /// Content blocks produced by the model.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// One content block inside the response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Text payload of the block.
    #[serde(default)]
    pub text: String,
}

impl InvokeResponse {
    /// Decodes a raw response body into the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Envelope`] if the bytes are not a valid
    /// envelope document.
    pub fn from_slice(body: &[u8]) -> Result<Self, InvokeError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Returns the text of the first content block, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|block| block.text.as_str())
    }
}
