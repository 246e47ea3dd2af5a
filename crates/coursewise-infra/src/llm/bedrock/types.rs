//! AWS Bedrock request/response types.
//!
//! Bedrock Claude models use the Messages API JSON format with two quirks:
//! the `model` field is omitted from the request body (it goes in the URL
//! path), and an `anthropic_version` field is required in the body.

use serde::{Deserialize, Serialize};

/// A single message in a Bedrock Claude request.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockMessage {
    pub role: String,
    pub content: String,
}

/// Request body for Bedrock Claude `invoke`.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockTextRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<BedrockMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// A content block in a Bedrock Claude response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BedrockContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Token usage reported by Bedrock.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Response body for a non-streaming Bedrock Claude invoke.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockTextResponse {
    pub id: String,
    pub model: String,
    pub content: Vec<BedrockContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: BedrockUsage,
}

/// Request body for a Titan embedding invoke.
#[derive(Debug, Clone, Serialize)]
pub struct TitanEmbedRequest {
    #[serde(rename = "inputText")]
    pub input_text: String,
}

/// Response body for a Titan embedding invoke.
#[derive(Debug, Clone, Deserialize)]
pub struct TitanEmbedResponse {
    pub embedding: Vec<f32>,
}
