//! Application state wiring all components together.
//!
//! AppState pins the generic turn engine to the concrete infra
//! implementations (Bedrock text generation, Titan-embedded course index,
//! in-memory session store) used by the REST API handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

use coursewise_core::conversation::engine::{EngineConfig, TurnEngine};
use coursewise_infra::catalog::load_courses;
use coursewise_infra::llm::{BedrockProvider, TitanEmbedder};
use coursewise_infra::retrieval::CourseIndex;
use coursewise_infra::session::InMemorySessionStore;
use coursewise_types::config::AppConfig;

/// Turn engine pinned to the production collaborators.
pub type ConcreteEngine = TurnEngine<BedrockProvider, CourseIndex<TitanEmbedder>>;

/// Shared application state used by the REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub store: Arc<InMemorySessionStore>,
    /// Directory chat log exports are written to.
    pub export_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load the catalog, build the
    /// course index, wire the engine.
    pub async fn init(config: &AppConfig, api_key: SecretString) -> anyhow::Result<Self> {
        let courses = load_courses(&config.catalog.path)
            .await
            .with_context(|| format!("loading course catalog from {}", config.catalog.path))?;

        // Both clients hold their own copy of the bearer token.
        let embed_key = SecretString::from(api_key.expose_secret().to_string());
        let embedder = TitanEmbedder::new(
            embed_key,
            config.bedrock.embedding_model_id.clone(),
            config.bedrock.region.clone(),
        );
        let index = CourseIndex::build(embedder, courses)
            .await
            .context("building course index")?;

        let generator = BedrockProvider::new(
            api_key,
            config.bedrock.model_id.clone(),
            config.bedrock.region.clone(),
        );

        let engine_config = EngineConfig {
            model: config.bedrock.model_id.clone(),
            temperature: config.bedrock.temperature,
            top_p: config.bedrock.top_p,
            max_tokens: config.bedrock.max_tokens,
            top_k: config.retrieval.top_k,
        };

        Ok(Self {
            engine: Arc::new(TurnEngine::new(generator, index, engine_config)),
            store: Arc::new(InMemorySessionStore::new()),
            export_dir: PathBuf::from(&config.export.dir),
        })
    }
}
