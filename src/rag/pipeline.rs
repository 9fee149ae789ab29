//! Conversation orchestration: Retrieve -> Compose -> Generate or fall back

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::config::ConversationConfig;
use crate::config::RetrievalConfig;
use crate::embeddings::EmbeddingProvider;
use crate::errors::Result;
use crate::index::SimilarityIndex;
use crate::llm::LlmService;
use crate::models::ComparisonRequest;
use crate::models::ConversationTurn;
use crate::models::ScoredResult;
use crate::models::DEFAULT_RESULT_COUNT;
use crate::rag::fallback::comparison_fallback;
use crate::rag::fallback::fallback;
use crate::rag::fallback::no_match;
use crate::rag::ContextAssembler;
use crate::rag::ConversationHistory;
use crate::rag::Generation;
use crate::rag::ResponseGenerator;
use crate::rag::Retriever;

/// Where the response text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Accepted output of the text generator
    Generated,
    /// Template answer after a failed or rejected generation
    Fallback,
    /// Nothing was retrieved; the generator was not called
    NoResults,
}

/// Answer to a single query
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub results: Vec<ScoredResult>,
    pub source: ResponseSource,
}

/// Answer to a two-query comparison
#[derive(Debug, Clone)]
pub struct ComparisonResponse {
    pub text: String,
    pub left: Vec<ScoredResult>,
    pub right: Vec<ScoredResult>,
    pub source: ResponseSource,
}

/// Top-level coordinator for one conversation session.
///
/// Owns the bounded history; every other collaborator is shared and
/// immutable, so several orchestrators may run over the same index.
pub struct ConversationOrchestrator {
    session_id: Uuid,
    retriever: Retriever,
    context_assembler: ContextAssembler,
    generator: ResponseGenerator,
    history: RwLock<ConversationHistory>,
    default_k: usize,
    floor: f32,
}

impl ConversationOrchestrator {
    pub fn new(
        retriever: Retriever,
        context_assembler: ContextAssembler,
        generator: ResponseGenerator,
        conversation: &ConversationConfig,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            retriever,
            context_assembler,
            generator,
            history: RwLock::new(ConversationHistory::new(conversation.history_capacity)),
            default_k: DEFAULT_RESULT_COUNT,
            floor: 0.0,
        }
    }

    /// Use the configured result count and similarity floor
    #[must_use]
    pub fn with_retrieval(mut self, retrieval: &RetrievalConfig) -> Self {
        self.default_k = retrieval.default_k;
        self.floor = retrieval.similarity_floor;
        self
    }

    /// Wire the HTTP text generator and the configured pipeline settings
    /// around an embedding provider and an already populated index.
    ///
    /// # Errors
    /// - LLM service configuration errors (invalid endpoint or key)
    pub fn from_config(
        config: &AppConfig,
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
    ) -> Result<Self> {
        let llm = Arc::new(LlmService::new(config)?);
        let retriever = Retriever::new(embeddings, index);
        let context_assembler = ContextAssembler::new(
            config.retrieval.context_items,
            config.retrieval.max_context_length,
        );
        let generator = ResponseGenerator::from_config(llm, &config.generation);

        Ok(
            Self::new(retriever, context_assembler, generator, &config.conversation)
                .with_retrieval(&config.retrieval),
        )
    }

    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Answer a single free-text query.
    ///
    /// # Errors
    /// `RetrievalFailure` when embedding or index lookup fails; the input is
    /// not recorded in that case. Generation problems never surface here.
    pub async fn handle_query(&self, text: &str) -> Result<ChatResponse> {
        self.handle_query_with_cancel(text, &CancellationToken::new())
            .await
    }

    /// Like [`handle_query`](Self::handle_query); if `cancel` fires while
    /// generating, the answer is the fallback for the retrieved results.
    pub async fn handle_query_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse> {
        info!("[{}] Processing query: {}", self.session_id, text);

        debug!("Step 1: Retrieving food items");
        let results = self.retriever.retrieve(text, self.default_k, self.floor).await?;
        debug!("Retrieved {} results", results.len());

        let response = if results.is_empty() {
            ChatResponse {
                text: no_match(text),
                results,
                source: ResponseSource::NoResults,
            }
        } else {
            debug!("Step 2: Assembling context");
            let context = self.context_assembler.assemble(&results);

            debug!("Step 3: Generating answer");
            match self.generator.generate_with_cancel(text, &context, cancel).await {
                Generation::Generated(answer) => ChatResponse {
                    text: answer,
                    results,
                    source: ResponseSource::Generated,
                },
                Generation::Failed(reason) => {
                    warn!("Using fallback answer: {}", reason);
                    ChatResponse {
                        text: fallback(text, &results),
                        results,
                        source: ResponseSource::Fallback,
                    }
                }
            }
        };

        self.history.write().await.push(text);
        info!("Query answered ({:?})", response.source);
        Ok(response)
    }

    /// Contrast the best matches of two independent queries.
    ///
    /// Both retrievals run concurrently. Comparisons are not recorded in the
    /// history.
    ///
    /// # Errors
    /// `RetrievalFailure` when either retrieval fails.
    pub async fn handle_comparison(&self, first: &str, second: &str) -> Result<ComparisonResponse> {
        self.handle_comparison_with_cancel(first, second, &CancellationToken::new())
            .await
    }

    /// Like [`handle_comparison`](Self::handle_comparison); if `cancel` fires
    /// while generating, the answer is the comparison fallback.
    pub async fn handle_comparison_with_cancel(
        &self,
        first: &str,
        second: &str,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResponse> {
        self.compare(&ComparisonRequest::new(first, second), cancel)
            .await
    }

    pub async fn compare(
        &self,
        request: &ComparisonRequest,
        cancel: &CancellationToken,
    ) -> Result<ComparisonResponse> {
        let (first, second) = (request.first.as_str(), request.second.as_str());
        info!("[{}] Comparing '{}' with '{}'", self.session_id, first, second);

        let (left, right) = tokio::try_join!(
            self.retriever.retrieve(first, self.default_k, self.floor),
            self.retriever.retrieve(second, self.default_k, self.floor),
        )?;
        debug!("Retrieved {} and {} results", left.len(), right.len());

        let (text, source) = match (left.first(), right.first()) {
            (Some(a), Some(b)) => {
                let outcome = self
                    .generator
                    .generate_comparison_with_cancel((first, a.name()), (second, b.name()), cancel)
                    .await;
                match outcome {
                    Generation::Generated(answer) => (answer, ResponseSource::Generated),
                    Generation::Failed(reason) => {
                        warn!("Using fallback comparison: {}", reason);
                        (
                            comparison_fallback(first, &left, second, &right),
                            ResponseSource::Fallback,
                        )
                    }
                }
            }
            (None, None) => (
                comparison_fallback(first, &left, second, &right),
                ResponseSource::NoResults,
            ),
            _ => (
                comparison_fallback(first, &left, second, &right),
                ResponseSource::Fallback,
            ),
        };

        Ok(ComparisonResponse {
            text,
            left,
            right,
            source,
        })
    }

    /// Snapshot of the recorded turns, oldest first
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.read().await.turns()
    }

    /// The last `n` recorded turns, oldest first
    pub async fn recent_history(&self, n: usize) -> Vec<ConversationTurn> {
        self.history.read().await.recent(n)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::embeddings::HashingEmbedder;
    use crate::index::InMemoryIndex;
    use crate::llm::GenerationParams;
    use crate::llm::TextGenerator;
    use crate::models::FoodItem;

    struct EchoGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Both dishes are great picks for tonight's dinner.".to_string())
        }
    }

    fn item(i: usize, name: &str, cuisine: &str, calories: u32, description: &str) -> FoodItem {
        FoodItem {
            id: format!("food_{i}"),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            description: description.to_string(),
            calories,
            ingredients: Vec::new(),
            health_benefits: None,
            cooking_method: None,
            taste_profile: None,
        }
    }

    async fn orchestrator() -> (ConversationOrchestrator, Arc<EchoGenerator>) {
        let embedder = Arc::new(HashingEmbedder::new(1024).unwrap());
        let index = Arc::new(InMemoryIndex::new(1024));
        for food in [
            item(0, "Penne Arrabbiata", "Italian", 380, "spicy tomato pasta"),
            item(1, "Miso Soup", "Japanese", 90, "light savory broth"),
        ] {
            let vector = embedder.embed_sync(&food.searchable_text());
            index.add(food, vector).await.unwrap();
        }

        let generator = Arc::new(EchoGenerator {
            calls: AtomicUsize::new(0),
        });
        let responder = ResponseGenerator::new(
            generator.clone(),
            GenerationParams::default(),
            20,
            30,
            Duration::from_secs(5),
        );
        let orchestrator = ConversationOrchestrator::new(
            Retriever::new(embedder, index),
            ContextAssembler::default(),
            responder,
            &ConversationConfig::default(),
        )
        .with_retrieval(&RetrievalConfig {
            similarity_floor: 0.1,
            ..RetrievalConfig::default()
        });
        (orchestrator, generator)
    }

    #[tokio::test]
    async fn test_generated_answer_is_recorded() {
        let (orchestrator, generator) = orchestrator().await;
        let response = orchestrator.handle_query("spicy pasta").await.unwrap();

        assert_eq!(response.source, ResponseSource::Generated);
        assert_eq!(response.results[0].name(), "Penne Arrabbiata");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        let history = orchestrator.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].input, "spicy pasta");
    }

    #[tokio::test]
    async fn test_no_results_skip_generator() {
        let (orchestrator, generator) = orchestrator().await;
        let response = orchestrator.handle_query("   ").await.unwrap();

        assert_eq!(response.source, ResponseSource::NoResults);
        assert!(response.results.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comparison_generates_when_both_sides_match() {
        let (orchestrator, generator) = orchestrator().await;
        let response = orchestrator
            .handle_comparison("spicy pasta", "light broth")
            .await
            .unwrap();

        assert_eq!(response.source, ResponseSource::Generated);
        assert_eq!(response.left[0].name(), "Penne Arrabbiata");
        assert_eq!(response.right[0].name(), "Miso Soup");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(orchestrator.history().await.is_empty());
    }
}
