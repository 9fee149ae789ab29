//! RAG (Retrieval-Augmented Generation) module
//!
//! This module turns a free-text food request into an answer:
//! - Semantic retrieval using vector embeddings
//! - Context assembly from the top results
//! - LLM-based answer generation with output validation
//! - Deterministic template fallback when generation is unusable
//! - A conversation orchestrator with bounded history
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use foodrag::config::AppConfig;
//! use foodrag::embeddings::create_embedding_provider;
//! use foodrag::index::InMemoryIndex;
//! use foodrag::rag::ConversationOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let embeddings = create_embedding_provider(&config)?;
//!     let index = Arc::new(InMemoryIndex::new(config.embedding_dimension()));
//!     let items = foodrag::data::load_food_data(config.dataset_path())?;
//!     foodrag::data::index_items(embeddings.as_ref(), index.as_ref(), items).await?;
//!
//!     let chat = ConversationOrchestrator::from_config(&config, embeddings, index)?;
//!     let response = chat.handle_query("something spicy and vegetarian").await?;
//!     println!("{}", response.text);
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod fallback;
pub mod generator;
pub mod history;
pub mod pipeline;
pub mod prompts;
pub mod retriever;

pub use context::ContextAssembler;
pub use generator::Generation;
pub use generator::GenerationFailure;
pub use generator::ResponseGenerator;
pub use history::ConversationHistory;
pub use pipeline::ChatResponse;
pub use pipeline::ComparisonResponse;
pub use pipeline::ConversationOrchestrator;
pub use pipeline::ResponseSource;
pub use retriever::Retriever;
