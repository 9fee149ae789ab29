pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;


pub use app::FoodRag;
pub use config::AppConfig;
pub use errors::*;
