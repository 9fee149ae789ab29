//! Similarity index abstraction
//!
//! The pipeline asks an index for the `k` nearest items to a query vector and
//! gets back hits ordered by ascending distance. The bundled
//! [`InMemoryIndex`] uses cosine distance, which is bounded to [0, 2].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

pub use memory::IndexHealth;
pub use memory::InMemoryIndex;

use crate::errors::Result;
use crate::models::FoodItem;
use crate::models::ItemFilter;

/// One nearest-neighbor answer
#[derive(Debug, Clone)]
pub struct IndexHit {
    pub item: Arc<FoodItem>,
    pub distance: f32,
}

/// Nearest-neighbor store of item vectors and metadata
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Up to `k` items passing `filter`, ordered by ascending distance
    async fn query(&self, vector: &[f32], k: usize, filter: &ItemFilter) -> Result<Vec<IndexHit>>;

    /// Store an item; only the data-loading layer calls this
    async fn add(&self, item: FoodItem, vector: Vec<f32>) -> Result<()>;

    /// Number of stored items
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
