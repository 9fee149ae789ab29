//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - search: retrieval without generation
//! - rag: single answers and comparisons
//! - chat: the interactive loop
//! - info: health and configuration display

pub mod chat;
pub mod info;
pub mod rag;
pub mod search;

// Re-export all public handlers
pub use chat::*;
pub use info::*;
pub use rag::*;
pub use search::*;
