//! LLM backend implementations.

pub mod bedrock;
pub mod titan;

pub use bedrock::BedrockProvider;
pub use titan::TitanEmbedder;
