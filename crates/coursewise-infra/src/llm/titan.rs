//! Titan embedder backed by the Bedrock Runtime API.
//!
//! Amazon Titan embedding models accept one input text per invoke, so a
//! batch request issues one HTTP call per text and preserves input order.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use coursewise_core::embedding::Embedder;
use coursewise_types::error::RetrievalError;

use super::bedrock::types::{TitanEmbedRequest, TitanEmbedResponse};

/// Output dimensionality of amazon.titan-embed-text-v1.
const TITAN_V1_DIMENSION: usize = 1536;

/// Bedrock Titan text-embedding backend.
pub struct TitanEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    region: String,
    model_id: String,
}

impl TitanEmbedder {
    /// Create a new Titan embedder for the given model and region.
    pub fn new(api_key: SecretString, model_id: String, region: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            region,
            model_id,
        }
    }

    fn invoke_url(&self) -> String {
        format!(
            "https://bedrock-runtime.{}.amazonaws.com/model/{}/invoke",
            self.region, self.model_id
        )
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let body = TitanEmbedRequest {
            input_text: text.to_string(),
        };

        let response = self
            .client
            .post(self.invoke_url())
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Titan API error response");
            return Err(RetrievalError::Embedding(format!(
                "HTTP {status}: {error_body}"
            )));
        }

        let embed_resp: TitanEmbedResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::Embedding(format!("failed to parse response: {e}")))?;

        Ok(embed_resp.embedding)
    }
}

// TitanEmbedder intentionally does NOT derive Debug to prevent
// accidental exposure of internal state.

impl Embedder for TitanEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed_one(text).await?);
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        TITAN_V1_DIMENSION
    }
}
