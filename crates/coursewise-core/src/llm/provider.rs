//! TextGenerator trait definition.
//!
//! The narrow contract the conversation core uses to invoke the hosted
//! text-generation service. Uses native async fn in traits (RPITIT,
//! Rust 2024 edition). Implementations live in coursewise-infra
//! (e.g., `BedrockProvider`).

use coursewise_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-generation backends.
///
/// The core treats any non-error but empty completion as "no usable
/// output" and falls back; only transport/protocol failures are errors.
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g., "bedrock").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
