//! Text generation
//!
//! [`TextGenerator`] is the seam between the pipeline and a language model.
//! [`LlmService`] talks to Ollama or an OpenAI-compatible chat endpoint.

pub mod client;

use async_trait::async_trait;

pub use client::LlmService;

use crate::config::GenerationConfig;
use crate::errors::Result;

/// Fixed decoding parameters passed on every generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_length: usize,
    pub temperature: f32,
    pub top_p: f32,
    /// Greedy decoding when false
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

impl From<&GenerationConfig> for GenerationParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_length: config.max_length,
            temperature: config.temperature,
            top_p: config.top_p,
            do_sample: config.do_sample,
        }
    }
}

impl GenerationParams {
    /// Temperature actually sent to the backend; zero when sampling is off
    pub fn effective_temperature(&self) -> f32 {
        if self.do_sample {
            self.temperature
        } else {
            0.0
        }
    }
}

/// Produces text for a prompt.
///
/// Implementations may fail or return empty text when the backend is
/// exhausted; callers validate the output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}
