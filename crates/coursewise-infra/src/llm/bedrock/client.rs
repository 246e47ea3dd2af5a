//! BedrockProvider -- concrete [`TextGenerator`] implementation for AWS
//! Bedrock.
//!
//! Sends non-streaming `invoke` requests to the AWS Bedrock Runtime API
//! using Bearer token authentication. The API key is wrapped in
//! [`secrecy::SecretString`] and is never logged or included in `Debug`
//! output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use coursewise_core::llm::TextGenerator;
use coursewise_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
};

use super::types::{BedrockContentBlock, BedrockMessage, BedrockTextRequest, BedrockTextResponse};

/// AWS Bedrock Claude text-generation backend.
pub struct BedrockProvider {
    client: reqwest::Client,
    api_key: SecretString,
    region: String,
    model_id: String,
}

impl BedrockProvider {
    /// The Anthropic API version for Bedrock.
    const API_VERSION: &'static str = "bedrock-2023-05-31";

    /// Create a new Bedrock provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bedrock bearer token wrapped in SecretString.
    /// * `model_id` - Full Bedrock model identifier
    ///   (e.g., "anthropic.claude-3-5-sonnet-20240620-v1:0").
    /// * `region` - AWS region (e.g., "us-east-1").
    pub fn new(api_key: SecretString, model_id: String, region: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            region,
            model_id,
        }
    }

    /// Build the full Bedrock Runtime invoke URL for a model.
    fn invoke_url(region: &str, model_id: &str) -> String {
        format!("https://bedrock-runtime.{region}.amazonaws.com/model/{model_id}/invoke")
    }

    /// Convert a generic [`CompletionRequest`] into a Bedrock request body.
    fn to_bedrock_request(&self, request: &CompletionRequest) -> BedrockTextRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| BedrockMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        BedrockTextRequest {
            anthropic_version: Self::API_VERSION.to_string(),
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature,
            top_p: request.top_p,
            stop_sequences: request.stop_sequences.clone(),
        }
    }

    /// Map a non-success HTTP status to the matching [`LlmError`].
    pub(crate) fn error_for_status(status: reqwest::StatusCode, body: String) -> LlmError {
        match status.as_u16() {
            400 => LlmError::InvalidRequest(body),
            401 | 403 => LlmError::AuthenticationFailed,
            429 => LlmError::RateLimited {
                retry_after_ms: None,
            },
            529 => LlmError::Overloaded(body),
            s if s >= 500 => LlmError::Provider {
                message: format!("Bedrock server error HTTP {status}: {body}"),
            },
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {body}"),
            },
        }
    }
}

// BedrockProvider intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl TextGenerator for BedrockProvider {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_bedrock_request(request);
        let model_id = if request.model.is_empty() {
            &self.model_id
        } else {
            &request.model
        };
        let url = Self::invoke_url(&self.region, model_id);

        tracing::debug!(url = %url, model_id = %model_id, region = %self.region, "Bedrock invoke request");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Bedrock API error response");
            return Err(Self::error_for_status(status, error_body));
        }

        let bedrock_resp: BedrockTextResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let content = bedrock_resp
            .content
            .iter()
            .filter_map(|block| match block {
                BedrockContentBlock::Text { text } => Some(text.as_str()),
                BedrockContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        let stop_reason = match bedrock_resp.stop_reason.as_deref() {
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::EndTurn,
        };

        Ok(CompletionResponse {
            id: bedrock_resp.id,
            content,
            model: bedrock_resp.model,
            stop_reason,
            usage: Usage {
                input_tokens: bedrock_resp.usage.input_tokens,
                output_tokens: bedrock_resp.usage.output_tokens,
            },
        })
    }
}
