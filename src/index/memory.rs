//! Exhaustive in-memory cosine index

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::IndexHit;
use super::SimilarityIndex;
use crate::embeddings::cosine_similarity;
use crate::errors::FoodRagError;
use crate::errors::Result;
use crate::models::FoodItem;
use crate::models::ItemFilter;

struct Entry {
    item: Arc<FoodItem>,
    vector: Vec<f32>,
}

/// Result of [`InMemoryIndex::health`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHealth {
    pub item_count: usize,
    pub dimension: usize,
    pub issues: Vec<String>,
}

impl IndexHealth {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Vector index held entirely in memory.
///
/// Every query scans all entries, which is fine for corpora of a few thousand
/// items. Distance is `1 - cosine_similarity`, so it always lies in [0, 2].
pub struct InMemoryIndex {
    dimension: usize,
    entries: RwLock<Vec<Entry>>,
}

impl InMemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Check the index is usable: non-empty, unique ids, non-zero vectors
    pub async fn health(&self) -> IndexHealth {
        let entries = self.entries.read().await;
        let mut issues = Vec::new();

        if entries.is_empty() {
            issues.push("Index is empty".to_string());
        }

        let mut seen = HashSet::new();
        for entry in entries.iter() {
            if !seen.insert(entry.item.id.as_str()) {
                issues.push(format!("Duplicate item id: {}", entry.item.id));
            }
            if entry.vector.iter().all(|v| *v == 0.0) {
                issues.push(format!(
                    "Item {} has a zero vector and can never match",
                    entry.item.id
                ));
            }
        }

        IndexHealth {
            item_count: entries.len(),
            dimension: self.dimension,
            issues,
        }
    }
}

#[async_trait]
impl SimilarityIndex for InMemoryIndex {
    async fn query(&self, vector: &[f32], k: usize, filter: &ItemFilter) -> Result<Vec<IndexHit>> {
        if vector.len() != self.dimension {
            return Err(FoodRagError::IndexError(format!(
                "Query vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimension
            )));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let entries = self.entries.read().await;
        let mut hits: Vec<IndexHit> = entries
            .iter()
            .filter(|entry| filter.matches(&entry.item))
            .map(|entry| IndexHit {
                item: Arc::clone(&entry.item),
                distance: 1.0 - cosine_similarity(vector, &entry.vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal distances
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);

        debug!(
            "Index scanned {} entries, returning {} hits",
            entries.len(),
            hits.len()
        );
        Ok(hits)
    }

    async fn add(&self, item: FoodItem, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(FoodRagError::IndexError(format!(
                "Vector for {} has {} dimensions, index expects {}",
                item.id,
                vector.len(),
                self.dimension
            )));
        }

        self.entries.write().await.push(Entry {
            item: Arc::new(item),
            vector,
        });
        Ok(())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
