//! Context assembly from retrieved items

use crate::models::ScoredResult;

/// Separator between rendered items in a generation context
pub const CONTEXT_SEPARATOR: &str = ", ";

/// Items rendered into a context when no count is configured
pub const DEFAULT_CONTEXT_ITEMS: usize = 3;

/// Assembler for creating generation context from search results
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_items: usize,
    max_context_length: usize,
}

impl ContextAssembler {
    /// Create a new context assembler
    #[must_use]
    pub const fn new(max_items: usize, max_context_length: usize) -> Self {
        Self {
            max_items,
            max_context_length,
        }
    }

    /// Render the configured number of top results
    #[must_use]
    pub fn assemble(&self, results: &[ScoredResult]) -> String {
        self.build_context(results, self.max_items)
    }

    /// Render the top `max_items` results as `name (cuisine, N cal)`.
    ///
    /// An empty input gives an empty string, which callers treat as "no
    /// evidence". The first entry is always kept; later entries are dropped
    /// once the character budget would be exceeded.
    #[must_use]
    pub fn build_context(&self, results: &[ScoredResult], max_items: usize) -> String {
        let mut context = String::new();

        for result in results.iter().take(max_items) {
            let entry = format_entry(result);
            let extra = if context.is_empty() {
                entry.len()
            } else {
                CONTEXT_SEPARATOR.len() + entry.len()
            };

            if !context.is_empty() && context.len() + extra > self.max_context_length {
                break;
            }

            if !context.is_empty() {
                context.push_str(CONTEXT_SEPARATOR);
            }
            context.push_str(&entry);
        }

        context
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_ITEMS, 1000)
    }
}

fn format_entry(result: &ScoredResult) -> String {
    format!(
        "{} ({}, {} cal)",
        result.item.name, result.item.cuisine, result.item.calories
    )
}
