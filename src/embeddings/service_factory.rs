//! Embedding provider factory
//!
//! Picks the concrete [`EmbeddingProvider`] named in `[embeddings]`.

use std::sync::Arc;

use tracing::info;

use super::EmbeddingClient;
use super::EmbeddingConfig;
use super::EmbeddingProvider;
use super::HashingEmbedder;
use super::ProviderKind;
use crate::config::AppConfig;
use crate::Result;

/// Create the embedding provider described by the configuration
pub fn create_embedding_provider(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedding_config = EmbeddingConfig::from_app_config(config)?;

    match embedding_config.provider {
        ProviderKind::Hashing => {
            info!(
                "Using offline hashing embeddings ({} dimensions)",
                embedding_config.dimension
            );
            Ok(Arc::new(HashingEmbedder::new(embedding_config.dimension)?))
        }
        provider => {
            info!(
                "Using {:?} embeddings: {} at {}",
                provider, embedding_config.model, embedding_config.endpoint
            );
            Ok(Arc::new(EmbeddingClient::new(&embedding_config)?))
        }
    }
}
