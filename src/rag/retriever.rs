//! Retrieval: query text to ranked, scored results

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingProvider;
use crate::errors::FoodRagError;
use crate::errors::Result;
use crate::index::IndexHit;
use crate::index::SimilarityIndex;
use crate::models::ItemFilter;
use crate::models::RetrievalRequest;
use crate::models::ScoredResult;

/// Retriever over an injected embedding provider and similarity index
#[derive(Clone)]
pub struct Retriever {
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(embeddings: Arc<dyn EmbeddingProvider>, index: Arc<dyn SimilarityIndex>) -> Self {
        Self { embeddings, index }
    }

    /// Semantic search using vector embeddings
    ///
    /// Blank queries and `k == 0` return an empty list without touching the
    /// embedding provider or the index.
    ///
    /// # Errors
    /// `RetrievalFailure` wrapping the embedding or index error.
    pub async fn retrieve(&self, query: &str, k: usize, floor: f32) -> Result<Vec<ScoredResult>> {
        self.retrieve_request(&RetrievalRequest::new(query).with_k(k).with_floor(floor))
            .await
    }

    /// Semantic search honoring every field of the request, including its filter
    pub async fn retrieve_request(&self, request: &RetrievalRequest) -> Result<Vec<ScoredResult>> {
        let query = request.query.trim();
        let k = request.effective_k();
        if query.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        debug!("Performing semantic search: {} (k={})", query, k);

        let query_embedding = self
            .embeddings
            .embed(query)
            .await
            .map_err(FoodRagError::retrieval)?;

        let hits = self
            .index
            .query(&query_embedding, k, &request.filter)
            .await
            .map_err(FoodRagError::retrieval)?;

        let results = score_hits(hits, request.floor);
        debug!("Retrieved {} results above floor {}", results.len(), request.floor);
        Ok(results)
    }

    /// Search restricted by cuisine and/or calories
    pub async fn retrieve_filtered(
        &self,
        query: &str,
        k: usize,
        filter: ItemFilter,
    ) -> Result<Vec<ScoredResult>> {
        self.retrieve_request(&RetrievalRequest::new(query).with_k(k).with_filter(filter))
            .await
    }

    /// Number of items the underlying index holds
    pub async fn indexed_items(&self) -> usize {
        self.index.len().await
    }
}

/// Convert distances to clamped similarities, drop results under `floor`,
/// and order by score descending with ties kept in index order.
fn score_hits(hits: Vec<IndexHit>, floor: f32) -> Vec<ScoredResult> {
    let mut results: Vec<ScoredResult> = hits
        .into_iter()
        .enumerate()
        .map(|(rank, hit)| ScoredResult {
            item: hit.item,
            score: distance_to_score(hit.distance),
            rank,
        })
        .filter(|result| result.score >= floor)
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.rank.cmp(&b.rank)));
    results
}

/// `1 - distance`, clamped to [0, 1]; NaN maps to 0
fn distance_to_score(distance: f32) -> f32 {
    let score = 1.0 - distance;
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;
    use crate::models::FoodItem;

    struct CountingEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FoodRagError::EmbeddingError("model not loaded".to_string()))
            } else {
                Ok(vec![1.0, 0.0])
            }
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Returns fixed distances in the given order, ignoring the vector
    struct FixedIndex {
        hits: Vec<(&'static str, f32)>,
    }

    #[async_trait]
    impl SimilarityIndex for FixedIndex {
        async fn query(&self, _v: &[f32], k: usize, _f: &ItemFilter) -> Result<Vec<IndexHit>> {
            Ok(self
                .hits
                .iter()
                .take(k)
                .map(|(name, distance)| IndexHit {
                    item: Arc::new(food(name)),
                    distance: *distance,
                })
                .collect())
        }

        async fn add(&self, _item: FoodItem, _vector: Vec<f32>) -> Result<()> {
            Err(FoodRagError::IndexError("read-only".to_string()))
        }

        async fn len(&self) -> usize {
            self.hits.len()
        }
    }

    struct BrokenIndex;

    #[async_trait]
    impl SimilarityIndex for BrokenIndex {
        async fn query(&self, _v: &[f32], _k: usize, _f: &ItemFilter) -> Result<Vec<IndexHit>> {
            Err(FoodRagError::IndexError("index file corrupted".to_string()))
        }

        async fn add(&self, _item: FoodItem, _vector: Vec<f32>) -> Result<()> {
            Err(FoodRagError::IndexError("index file corrupted".to_string()))
        }

        async fn len(&self) -> usize {
            3
        }
    }

    fn food(name: &str) -> FoodItem {
        FoodItem {
            id: name.to_lowercase(),
            name: name.to_string(),
            cuisine: "Test".to_string(),
            description: String::new(),
            calories: 100,
            ingredients: Vec::new(),
            health_benefits: None,
            cooking_method: None,
            taste_profile: None,
        }
    }

    fn build(hits: Vec<(&'static str, f32)>, fail: bool) -> (Retriever, Arc<CountingEmbedder>) {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            fail,
        });
        let index = Arc::new(FixedIndex { hits });
        (Retriever::new(embedder.clone(), index), embedder)
    }

    #[tokio::test]
    async fn test_blank_query_skips_embedding() {
        let (retriever, embedder) = build(vec![("A", 0.1)], false);
        for query in ["", "   ", "\n\t"] {
            assert!(retriever.retrieve(query, 5, 0.0).await.unwrap().is_empty());
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_k_is_empty() {
        let (retriever, embedder) = build(vec![("A", 0.1)], false);
        assert!(retriever.retrieve("pasta", 0, 0.0).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scores_are_clamped_and_sorted() {
        let (retriever, embedder) =
            build(vec![("Far", 1.7), ("Near", 0.11), ("Negative", -0.2)], false);
        let results = retriever.retrieve("pasta", 5, 0.0).await.unwrap();

        let names: Vec<&str> = results.iter().map(ScoredResult::name).collect();
        assert_eq!(names, vec!["Negative", "Near", "Far"]);
        assert!((results[0].score - 1.0).abs() < f32::EPSILON);
        assert!((results[1].score - 0.89).abs() < 1e-6);
        assert!(results[2].score.abs() < f32::EPSILON);
        assert_eq!(results[0].rank, 2);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ties_keep_index_order() {
        let (retriever, _) = build(vec![("B", 0.5), ("A", 0.5), ("C", 0.2)], false);
        let results = retriever.retrieve("anything", 5, 0.0).await.unwrap();
        let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![2, 0, 1]);
    }

    #[tokio::test]
    async fn test_floor_drops_low_scores() {
        let (retriever, _) = build(vec![("Good", 0.2), ("Meh", 0.6), ("Bad", 0.9)], false);
        let results = retriever.retrieve("soup", 5, 0.35).await.unwrap();
        let names: Vec<&str> = results.iter().map(ScoredResult::name).collect();
        assert_eq!(names, vec!["Good", "Meh"]);
    }

    #[tokio::test]
    async fn test_embedding_error_becomes_retrieval_failure() {
        let (retriever, _) = build(vec![("A", 0.1)], true);
        let err = retriever.retrieve("pasta", 5, 0.0).await.unwrap_err();
        match err {
            FoodRagError::RetrievalFailure(cause) => {
                assert!(matches!(*cause, FoodRagError::EmbeddingError(_)));
            }
            other => panic!("Expected RetrievalFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_error_becomes_retrieval_failure() {
        let embedder = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let retriever = Retriever::new(embedder.clone(), Arc::new(BrokenIndex));

        let err = retriever.retrieve("pasta", 5, 0.0).await.unwrap_err();
        match err {
            FoodRagError::RetrievalFailure(cause) => {
                assert!(matches!(*cause, FoodRagError::IndexError(_)));
            }
            other => panic!("Expected RetrievalFailure, got {other:?}"),
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distance_to_score() {
        assert!((distance_to_score(0.25) - 0.75).abs() < f32::EPSILON);
        assert!(distance_to_score(2.0).abs() < f32::EPSILON);
        assert!((distance_to_score(-1.0) - 1.0).abs() < f32::EPSILON);
        assert!(distance_to_score(f32::NAN).abs() < f32::EPSILON);
    }
}
