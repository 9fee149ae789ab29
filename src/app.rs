//! Application wiring shared by the CLI commands

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::data::index_items;
use crate::data::load_food_data;
use crate::embeddings::create_embedding_provider;
use crate::embeddings::EmbeddingProvider;
use crate::errors::Result;
use crate::index::IndexHealth;
use crate::index::InMemoryIndex;
use crate::models::FoodItem;
use crate::rag::ConversationOrchestrator;
use crate::rag::Retriever;

/// Loaded configuration plus a populated index
pub struct FoodRag {
    config: AppConfig,
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<InMemoryIndex>,
}

impl FoodRag {
    /// Build the embedding provider, then load and index the configured dataset
    ///
    /// # Errors
    /// - Embedding provider configuration errors
    /// - Dataset read or validation errors
    /// - Embedding or index errors while indexing
    pub async fn new(config: AppConfig) -> Result<Self> {
        let embeddings = create_embedding_provider(&config)?;
        let items = load_food_data(config.dataset_path())?;
        Self::with_items(config, embeddings, items).await
    }

    /// Index the given items instead of reading the dataset file
    pub async fn with_items(
        config: AppConfig,
        embeddings: Arc<dyn EmbeddingProvider>,
        items: Vec<FoodItem>,
    ) -> Result<Self> {
        let index = Arc::new(InMemoryIndex::new(embeddings.dimension()));
        let count = index_items(embeddings.as_ref(), index.as_ref(), items).await?;
        info!("Food index ready with {} items", count);

        Ok(Self {
            config,
            embeddings,
            index,
        })
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn embeddings(&self) -> Arc<dyn EmbeddingProvider> {
        Arc::clone(&self.embeddings)
    }

    pub fn retriever(&self) -> Retriever {
        Retriever::new(self.embeddings(), self.index.clone())
    }

    /// A fresh conversation session over the shared index
    ///
    /// # Errors
    /// LLM service configuration errors
    pub fn orchestrator(&self) -> Result<ConversationOrchestrator> {
        ConversationOrchestrator::from_config(&self.config, self.embeddings(), self.index.clone())
    }

    pub async fn index_health(&self) -> IndexHealth {
        self.index.health().await
    }
}
