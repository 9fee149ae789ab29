//! Response generation with output validation
//!
//! [`ResponseGenerator`] never returns an error. Anything that keeps it from
//! producing an acceptable answer comes back as [`Generation::Failed`] so the
//! caller can switch to the template fallback.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

use crate::config::GenerationConfig;
use crate::llm::GenerationParams;
use crate::llm::TextGenerator;
use crate::rag::prompts::build_comparison_prompt;
use crate::rag::prompts::build_recommendation_prompt;

/// Why a generated answer was not usable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("no retrieval context to generate from")]
    EmptyContext,

    #[error("generation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("generation cancelled")]
    Cancelled,

    #[error("output too short ({len} chars, need more than {min})")]
    Degenerate { len: usize, min: usize },

    #[error("generator error: {0}")]
    Generator(String),
}

/// Outcome of one generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Generated(String),
    Failed(GenerationFailure),
}

/// Wraps a [`TextGenerator`] with fixed decoding parameters, a time budget
/// and minimum-length checks
#[derive(Clone)]
pub struct ResponseGenerator {
    generator: Arc<dyn TextGenerator>,
    params: GenerationParams,
    min_response_chars: usize,
    min_comparison_chars: usize,
    timeout: Duration,
}

impl ResponseGenerator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        params: GenerationParams,
        min_response_chars: usize,
        min_comparison_chars: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            params,
            min_response_chars,
            min_comparison_chars,
            timeout,
        }
    }

    pub fn from_config(generator: Arc<dyn TextGenerator>, config: &GenerationConfig) -> Self {
        Self::new(
            generator,
            GenerationParams::from(config),
            config.min_response_chars,
            config.min_comparison_chars,
            config.timeout(),
        )
    }

    /// Generate a recommendation for `query` grounded in `context`.
    ///
    /// An empty context fails without calling the generator.
    pub async fn generate(&self, query: &str, context: &str) -> Generation {
        self.generate_with_cancel(query, context, &CancellationToken::new())
            .await
    }

    /// Like [`generate`](Self::generate), giving up as soon as `cancel` fires
    pub async fn generate_with_cancel(
        &self,
        query: &str,
        context: &str,
        cancel: &CancellationToken,
    ) -> Generation {
        if context.trim().is_empty() {
            return Generation::Failed(GenerationFailure::EmptyContext);
        }

        let prompt = build_recommendation_prompt(query, context);
        self.run(&prompt, self.min_response_chars, cancel).await
    }

    /// Generate a comparison between the best matches of two queries
    pub async fn generate_comparison(
        &self,
        first: (&str, &str),
        second: (&str, &str),
    ) -> Generation {
        self.generate_comparison_with_cancel(first, second, &CancellationToken::new())
            .await
    }

    /// Like [`generate_comparison`](Self::generate_comparison), giving up as
    /// soon as `cancel` fires
    pub async fn generate_comparison_with_cancel(
        &self,
        first: (&str, &str),
        second: (&str, &str),
        cancel: &CancellationToken,
    ) -> Generation {
        let (first_query, first_match) = first;
        let (second_query, second_match) = second;
        if first_match.trim().is_empty() || second_match.trim().is_empty() {
            return Generation::Failed(GenerationFailure::EmptyContext);
        }

        let prompt =
            build_comparison_prompt(first_query, first_match, second_query, second_match);
        self.run(&prompt, self.min_comparison_chars, cancel).await
    }

    async fn run(&self, prompt: &str, min_chars: usize, cancel: &CancellationToken) -> Generation {
        debug!("Generating with prompt of {} chars", prompt.len());

        let call = tokio::time::timeout(self.timeout, self.generator.generate(prompt, &self.params));
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            outcome = call => Some(outcome),
        };

        let failure = match outcome {
            None => GenerationFailure::Cancelled,
            Some(Err(_)) => GenerationFailure::TimedOut(self.timeout),
            Some(Ok(Err(e))) => GenerationFailure::Generator(e.to_string()),
            Some(Ok(Ok(raw))) => match validate(&raw, min_chars) {
                Ok(text) => return Generation::Generated(text),
                Err(failure) => failure,
            },
        };

        warn!("Generation failed: {}", failure);
        Generation::Failed(failure)
    }
}

/// Trim the raw output and require more than `min_chars` characters
fn validate(raw: &str, min_chars: usize) -> Result<String, GenerationFailure> {
    let text = raw.trim();
    let len = text.chars().count();
    if len <= min_chars {
        return Err(GenerationFailure::Degenerate { len, min: min_chars });
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::errors::FoodRagError;
    use crate::errors::Result;

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct StubGenerator {
        reply: Reply,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail => Err(FoodRagError::LlmError("backend down".to_string())),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn responder(stub: Arc<StubGenerator>) -> ResponseGenerator {
        ResponseGenerator::new(stub, GenerationParams::default(), 20, 30, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_accepts_and_trims_good_output() {
        let stub = StubGenerator::new(Reply::Text(
            "  Try the Penne Arrabbiata, it has a fiery tomato sauce.\n",
        ));
        let outcome = responder(stub.clone())
            .generate("spicy pasta", "Penne Arrabbiata (Italian, 380 cal)")
            .await;

        assert_eq!(
            outcome,
            Generation::Generated(
                "Try the Penne Arrabbiata, it has a fiery tomato sauce.".to_string()
            )
        );
        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("User wants: spicy pasta\n"));
    }

    #[tokio::test]
    async fn test_short_output_is_degenerate() {
        let stub = StubGenerator::new(Reply::Text("   ok   "));
        let outcome = responder(stub).generate("soup", "Miso Soup (Japanese, 90 cal)").await;
        assert_eq!(
            outcome,
            Generation::Failed(GenerationFailure::Degenerate { len: 2, min: 20 })
        );
    }

    #[test]
    fn test_length_must_exceed_minimum() {
        let exactly = "x".repeat(20);
        assert_eq!(
            validate(&exactly, 20),
            Err(GenerationFailure::Degenerate { len: 20, min: 20 })
        );
        assert_eq!(validate(&format!(" {exactly}y "), 20), Ok(format!("{exactly}y")));
        // Counted in characters, not bytes
        assert!(validate(&"é".repeat(21), 20).is_ok());
    }

    #[tokio::test]
    async fn test_empty_context_skips_generator() {
        let stub = StubGenerator::new(Reply::Text("a perfectly long enough answer"));
        let outcome = responder(stub.clone()).generate("soup", "").await;
        assert_eq!(outcome, Generation::Failed(GenerationFailure::EmptyContext));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generator_error_is_contained() {
        let stub = StubGenerator::new(Reply::Fail);
        let outcome = responder(stub).generate("tacos", "Tacos (Mexican, 410 cal)").await;
        assert!(matches!(
            outcome,
            Generation::Failed(GenerationFailure::Generator(_))
        ));
    }

    #[tokio::test]
    async fn test_timeout_fails() {
        let stub = StubGenerator::new(Reply::Hang);
        let generator = ResponseGenerator::new(
            stub,
            GenerationParams::default(),
            20,
            30,
            Duration::from_millis(50),
        );
        let outcome = generator.generate("tacos", "Tacos (Mexican, 410 cal)").await;
        assert_eq!(
            outcome,
            Generation::Failed(GenerationFailure::TimedOut(Duration::from_millis(50)))
        );
    }

    #[tokio::test]
    async fn test_cancel_stops_waiting() {
        let stub = StubGenerator::new(Reply::Hang);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = responder(stub)
            .generate_with_cancel("tacos", "Tacos (Mexican, 410 cal)", &cancel)
            .await;
        assert_eq!(outcome, Generation::Failed(GenerationFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_stops_comparison() {
        let stub = StubGenerator::new(Reply::Hang);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = responder(stub.clone())
            .generate_comparison_with_cancel(
                ("light lunch", "Miso Soup"),
                ("comfort food", "Lasagna"),
                &cancel,
            )
            .await;
        assert_eq!(outcome, Generation::Failed(GenerationFailure::Cancelled));
    }

    #[tokio::test]
    async fn test_comparison_uses_higher_minimum() {
        // 24 chars: enough for a recommendation, not for a comparison
        let stub = StubGenerator::new(Reply::Text("Miso Soup is the lighter"));
        let generator = responder(stub.clone());

        let outcome = generator
            .generate_comparison(("light lunch", "Miso Soup"), ("comfort food", "Lasagna"))
            .await;
        assert!(matches!(
            outcome,
            Generation::Failed(GenerationFailure::Degenerate { min: 30, .. })
        ));
        assert!(matches!(
            generator.generate("soup", "Miso Soup (Japanese, 90 cal)").await,
            Generation::Generated(_)
        ));

        let prompts = stub.prompts.lock().unwrap();
        assert_eq!(
            prompts[0],
            "Compare: 'light lunch' (best match: Miso Soup) vs 'comfort food' (best match: Lasagna). Which is better and why?"
        );
    }
}
