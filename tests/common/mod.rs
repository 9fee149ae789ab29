//! Stub collaborators shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use foodrag::config::ConversationConfig;
use foodrag::embeddings::EmbeddingProvider;
use foodrag::index::IndexHit;
use foodrag::index::SimilarityIndex;
use foodrag::llm::GenerationParams;
use foodrag::llm::TextGenerator;
use foodrag::models::FoodItem;
use foodrag::models::ItemFilter;
use foodrag::rag::ContextAssembler;
use foodrag::rag::ConversationOrchestrator;
use foodrag::rag::ResponseGenerator;
use foodrag::rag::Retriever;
use foodrag::FoodRagError;
use foodrag::Result;

pub fn food(name: &str, cuisine: &str, calories: u32) -> FoodItem {
    FoodItem {
        id: name.to_lowercase().replace(' ', "_"),
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        description: format!("{name} from the test menu"),
        calories,
        ingredients: Vec::new(),
        health_benefits: None,
        cooking_method: None,
        taste_profile: None,
    }
}

/// One-hot embedder over a fixed keyword vocabulary
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    pub calls: AtomicUsize,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Arc<Self> {
        Arc::new(Self {
            vocabulary: vocabulary.to_vec(),
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            vocabulary: vec!["anything"],
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FoodRagError::EmbeddingError(
                "embedding model unavailable".to_string(),
            ));
        }
        let text = text.to_lowercase();
        Ok(self
            .vocabulary
            .iter()
            .map(|word| if text.contains(word) { 1.0 } else { 0.0 })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Answers with fixed hits for the vocabulary slot the query vector lights up
pub struct MenuIndex {
    /// (slot, item, distance) in index order
    entries: Vec<(usize, Arc<FoodItem>, f32)>,
    fail: bool,
}

impl MenuIndex {
    pub fn new(entries: Vec<(usize, FoodItem, f32)>) -> Arc<Self> {
        Arc::new(Self {
            entries: entries
                .into_iter()
                .map(|(slot, item, distance)| (slot, Arc::new(item), distance))
                .collect(),
            fail: false,
        })
    }

    /// Every query fails with an index error
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            entries: Vec::new(),
            fail: true,
        })
    }
}

#[async_trait]
impl SimilarityIndex for MenuIndex {
    async fn query(&self, vector: &[f32], k: usize, filter: &ItemFilter) -> Result<Vec<IndexHit>> {
        if self.fail {
            return Err(FoodRagError::IndexError("menu index unavailable".to_string()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|(slot, item, _)| {
                vector.get(*slot).is_some_and(|v| *v > 0.0) && filter.matches(item)
            })
            .take(k)
            .map(|(_, item, distance)| IndexHit {
                item: Arc::clone(item),
                distance: *distance,
            })
            .collect())
    }

    async fn add(&self, _item: FoodItem, _vector: Vec<f32>) -> Result<()> {
        Err(FoodRagError::IndexError("menu index is read-only".to_string()))
    }

    async fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Clone, Copy)]
pub enum Reply {
    Text(&'static str),
    Fail,
    Hang,
}

pub struct StubGenerator {
    reply: Reply,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(FoodRagError::LlmError("model exhausted".to_string())),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }
}

/// Orchestrator over the stubs with default settings and the given timeout
pub fn orchestrator(
    embedder: Arc<KeywordEmbedder>,
    index: Arc<MenuIndex>,
    generator: Arc<StubGenerator>,
    timeout: Duration,
) -> ConversationOrchestrator {
    foodrag::logging::init_simple_logging();
    let responder = ResponseGenerator::new(
        generator,
        GenerationParams::default(),
        20,
        30,
        timeout,
    );
    ConversationOrchestrator::new(
        Retriever::new(embedder, index),
        ContextAssembler::default(),
        responder,
        &ConversationConfig::default(),
    )
}

/// Italian pasta menu: Penne Arrabbiata at 0.89 plus two weaker matches,
/// and a Mexican item only reachable through "tacos"
pub fn pasta_menu() -> (Arc<KeywordEmbedder>, Arc<MenuIndex>) {
    let embedder = KeywordEmbedder::new(&["pasta", "tacos"]);
    let index = MenuIndex::new(vec![
        (0, food("Lasagna", "Italian", 600), 0.45),
        (0, food("Penne Arrabbiata", "Italian", 380), 0.11),
        (0, food("Margherita Pizza", "Italian", 520), 0.29),
        (1, food("Chicken Tacos", "Mexican", 410), 0.18),
    ]);
    (embedder, index)
}
