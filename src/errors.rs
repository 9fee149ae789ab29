use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodRagError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Retrieval failed: {0}")]
    RetrievalFailure(#[source] Box<FoodRagError>),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl FoodRagError {
    /// Wrap an embedding or index failure as a retrieval failure.
    ///
    /// Already-wrapped errors are returned unchanged.
    #[must_use]
    pub fn retrieval(cause: Self) -> Self {
        match cause {
            Self::RetrievalFailure(_) => cause,
            other => Self::RetrievalFailure(Box::new(other)),
        }
    }

    /// Whether this error came from the embedding/index layer
    pub const fn is_retrieval_failure(&self) -> bool {
        matches!(self, Self::RetrievalFailure(_))
    }

    /// Text safe to show to an end user instead of the raw error
    pub fn user_message(&self) -> String {
        match self {
            Self::RetrievalFailure(_) => {
                "Search is currently unavailable. Please try again in a moment.".to_string()
            }
            other => format!("Sorry, something went wrong: {other}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, FoodRagError>;
