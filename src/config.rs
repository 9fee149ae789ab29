use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::FoodRagError;

/// Hard cap on the number of results a single retrieval may request
pub const MAX_RESULTS_CAP: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the rolling log file; `None` logs to stderr only
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// `ollama`, `openai` or `hashing`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_embedding_provider() -> String {
    "ollama".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

const fn default_embedding_dimension() -> usize {
    384
}

fn default_embedding_endpoint() -> String {
    "http://localhost:11434".to_string()
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            endpoint: default_embedding_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub llm_endpoint: String,
    #[serde(default = "default_llm_key")]
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_key() -> String {
    "ollama".to_string()
}

fn default_llm_model() -> String {
    "flan-t5-base".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_endpoint: default_llm_endpoint(),
            llm_key: default_llm_key(),
            llm_model: default_llm_model(),
        }
    }
}

/// Decoding parameters and acceptance rules for generated answers.
///
/// These are fixed per process; callers cannot override them per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_do_sample")]
    pub do_sample: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// A recommendation must be longer than this many characters
    #[serde(default = "default_min_response_chars")]
    pub min_response_chars: usize,
    /// A comparison must be longer than this many characters
    #[serde(default = "default_min_comparison_chars")]
    pub min_comparison_chars: usize,
}

const fn default_max_length() -> usize {
    400
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_top_p() -> f32 {
    0.9
}

const fn default_do_sample() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_min_response_chars() -> usize {
    20
}

const fn default_min_comparison_chars() -> usize {
    30
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            do_sample: default_do_sample(),
            timeout_secs: default_timeout_secs(),
            min_response_chars: default_min_response_chars(),
            min_comparison_chars: default_min_comparison_chars(),
        }
    }
}

impl GenerationConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_k")]
    pub default_k: usize,
    #[serde(default)]
    pub similarity_floor: f32,
    /// Results rendered into the generation context
    #[serde(default = "default_context_items")]
    pub context_items: usize,
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,
}

const fn default_k() -> usize {
    5
}

const fn default_context_items() -> usize {
    3
}

const fn default_max_context_length() -> usize {
    1000
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            similarity_floor: 0.0,
            context_items: default_context_items(),
            max_context_length: default_max_context_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

const fn default_history_capacity() -> usize {
    10
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("./data/FoodDataSet.json")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub data: DataConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(FoodRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.embeddings.dimension == 0 {
            return Err(FoodRagError::ConfigError(
                "embeddings.dimension must be greater than zero".to_string(),
            ));
        }
        if self.retrieval.default_k == 0 || self.retrieval.default_k > MAX_RESULTS_CAP {
            return Err(FoodRagError::ConfigError(format!(
                "retrieval.default_k must be between 1 and {MAX_RESULTS_CAP}"
            )));
        }
        if !(0.0..=1.0).contains(&self.retrieval.similarity_floor) {
            return Err(FoodRagError::ConfigError(
                "retrieval.similarity_floor must be within [0, 1]".to_string(),
            ));
        }
        if self.retrieval.context_items == 0 {
            return Err(FoodRagError::ConfigError(
                "retrieval.context_items must be greater than zero".to_string(),
            ));
        }
        if self.conversation.history_capacity == 0 {
            return Err(FoodRagError::ConfigError(
                "conversation.history_capacity must be greater than zero".to_string(),
            ));
        }
        if self.generation.max_length == 0 {
            return Err(FoodRagError::ConfigError(
                "generation.max_length must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get the dataset location
    pub fn dataset_path(&self) -> &Path {
        &self.data.dataset_path
    }
}
