//! Embeddings generation module
//!
//! Text is turned into fixed-length vectors by an [`EmbeddingProvider`]. The
//! pipeline only ever sees the trait; concrete providers are:
//! - [`EmbeddingClient`]: OpenAI-compatible or Ollama HTTP endpoints
//! - [`HashingEmbedder`]: offline feature hashing, deterministic and model-free
//!
//! # Examples
//!
//! ```rust,no_run
//! use foodrag::config::AppConfig;
//! use foodrag::embeddings::create_embedding_provider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let provider = create_embedding_provider(&config)?;
//!
//!     let embedding = provider.embed("spicy Italian pasta").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod hashing;
pub mod service_factory;
pub mod text_preprocessing;

use async_trait::async_trait;

pub use client::EmbeddingClient;
pub use hashing::HashingEmbedder;
pub use service_factory::create_embedding_provider;
pub use text_preprocessing::preprocess_text_for_embedding;

use crate::errors::FoodRagError;
use crate::errors::Result;

/// Maps text to a fixed-length vector.
///
/// Implementations must return the same vector for the same input within a
/// process lifetime.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of every vector this provider returns
    fn dimension(&self) -> usize;
}

/// Supported embedding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// `OpenAI` embeddings API (or any compatible endpoint)
    OpenAI,
    /// Ollama local embeddings
    Ollama,
    /// Offline feature hashing
    Hashing,
}

impl std::str::FromStr for ProviderKind {
    type Err = FoodRagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "hashing" | "offline" => Ok(Self::Hashing),
            other => Err(FoodRagError::ConfigError(format!(
                "Unknown embedding provider: {other}"
            ))),
        }
    }
}

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Result<Self> {
        let provider: ProviderKind = config.embeddings.provider.parse()?;

        Ok(Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: config.embeddings.endpoint.trim_end_matches('/').to_string(),
            api_key: config.embeddings.api_key.clone(),
        })
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
