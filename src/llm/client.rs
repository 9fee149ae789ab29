//! HTTP client for text generation backends

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::GenerationParams;
use super::TextGenerator;
use crate::config::AppConfig;
use crate::errors::FoodRagError;
use crate::errors::Result;

/// Which wire protocol the endpoint speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    /// Ollama `/api/generate`
    Ollama,
    /// OpenAI-compatible `/chat/completions`
    OpenAI,
}

/// Text generation over HTTP
pub struct LlmService {
    backend: LlmBackend,
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl LlmService {
    /// Create a new LLM service from configuration
    ///
    /// The backend is Ollama when the key is `ollama` or the endpoint is not
    /// an OpenAI URL, otherwise OpenAI-compatible.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let backend = if config.llm_key() == "ollama" || !config.llm_endpoint().contains("openai")
        {
            LlmBackend::Ollama
        } else {
            LlmBackend::OpenAI
        };
        Self::with_backend(
            backend,
            config.llm_endpoint(),
            config.llm_key(),
            config.llm_model(),
        )
    }

    /// Create a service for an explicit backend
    pub fn with_backend(
        backend: LlmBackend,
        endpoint: &str,
        api_key: &str,
        model: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| FoodRagError::HttpError(e.to_string()))?;

        Ok(Self {
            backend,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub const fn backend(&self) -> LlmBackend {
        self.backend
    }

    async fn generate_ollama(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        #[derive(Serialize)]
        struct OllamaOptions {
            num_predict: usize,
            temperature: f32,
            top_p: f32,
        }

        #[derive(Serialize)]
        struct OllamaRequest<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: OllamaOptions,
        }

        #[derive(Deserialize)]
        struct OllamaResponse {
            response: String,
        }

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Calling Ollama generate API: {}", url);

        let request = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                num_predict: params.max_length,
                temperature: params.effective_temperature(),
                top_p: params.top_p,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| FoodRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FoodRagError::LlmError(format!(
                "Ollama API error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response
            .json()
            .await
            .map_err(|e| FoodRagError::LlmError(format!("Failed to parse response: {e}")))?;

        Ok(result.response)
    }

    async fn generate_openai(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            max_tokens: usize,
            temperature: f32,
            top_p: f32,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling OpenAI chat completions API: {}", url);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_length,
            temperature: params.effective_temperature(),
            top_p: params.top_p,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| FoodRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FoodRagError::LlmError(format!(
                "OpenAI API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| FoodRagError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| FoodRagError::LlmError("No choices in response".to_string()))
    }
}

#[async_trait]
impl TextGenerator for LlmService {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        match self.backend {
            LlmBackend::Ollama => self.generate_ollama(prompt, params).await,
            LlmBackend::OpenAI => self.generate_openai(prompt, params).await,
        }
    }
}
