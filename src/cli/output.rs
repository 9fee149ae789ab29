//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `foodrag` CLI

use crate::index::IndexHealth;
use crate::models::ConversationTurn;
use crate::models::ScoredResult;
use crate::rag::ChatResponse;
use crate::rag::ComparisonResponse;
use crate::rag::ResponseSource;
use crate::AppConfig;

/// Rows shown in the side-by-side comparison table
const COMPARISON_ROWS: usize = 3;
const COLUMN_WIDTH: usize = 30;

/// Cuisines suggested after a result list
const SUGGESTED_CUISINES: usize = 3;
/// Average calories above which lighter options are suggested
const HEARTY_AVERAGE_CALORIES: f64 = 350.0;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Multi-byte characters are never split.
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print a search header
pub fn print_search_header(query: &str, filters: &str) {
    println!("🔍 Searching for: '{query}' ({filters})");
}

/// One line per result with cuisine, calories and match percentage
pub fn print_results(results: &[ScoredResult]) {
    if results.is_empty() {
        print_warning("No matching food items found");
        return;
    }

    println!();
    for (i, result) in results.iter().enumerate() {
        let item = &result.item;
        println!("{}. 🍽️  {}", i + 1, item.name);
        println!(
            "   📍 {} | 🔥 {} cal | 📈 {:.1}% match",
            item.cuisine,
            item.calories,
            result.score * 100.0
        );
        if !item.description.is_empty() {
            println!("   {}", truncate_str(&item.description, 100));
        }
        println!();
    }
}

/// Follow-up searches for the cuisines in `results` plus a calorie hint.
///
/// Empty when there are no results.
#[must_use]
pub fn related_searches(results: &[ScoredResult]) -> Vec<String> {
    if results.is_empty() {
        return Vec::new();
    }

    let mut cuisines: Vec<&str> = Vec::new();
    for result in results {
        let cuisine = result.cuisine();
        if !cuisines.contains(&cuisine) {
            cuisines.push(cuisine);
        }
    }

    let mut suggestions: Vec<String> = cuisines
        .into_iter()
        .take(SUGGESTED_CUISINES)
        .map(|cuisine| format!("Try '{cuisine} dishes' for more {cuisine} options"))
        .collect();

    let total: f64 = results.iter().map(|r| f64::from(r.item.calories)).sum();
    if total / results.len() as f64 > HEARTY_AVERAGE_CALORIES {
        suggestions.push("Try 'low calorie' for lighter options".to_string());
    } else {
        suggestions.push("Try 'hearty meal' for more substantial dishes".to_string());
    }
    suggestions
}

pub fn print_related_searches(results: &[ScoredResult]) {
    let suggestions = related_searches(results);
    if suggestions.is_empty() {
        return;
    }
    println!("💡 Related searches you might like:");
    for suggestion in suggestions {
        println!("   • {suggestion}");
    }
}

fn source_label(source: ResponseSource) -> &'static str {
    match source {
        ResponseSource::Generated => "AI-generated",
        ResponseSource::Fallback => "template",
        ResponseSource::NoResults => "no matches",
    }
}

/// Print the bot answer followed by the top results it was based on
pub fn print_chat_response(response: &ChatResponse, verbose: bool) {
    println!("\n🤖 Bot: {}", response.text);
    if verbose {
        println!("   ({})", source_label(response.source));
    }

    if !response.results.is_empty() {
        println!("\n📊 Search Results Details:");
        println!("{}", "-".repeat(45));
        print_results(&response.results[..response.results.len().min(COMPARISON_ROWS)]);
    }
}

/// Render the side-by-side table of two result lists
#[must_use]
pub fn format_comparison_table(
    first_query: &str,
    second_query: &str,
    left: &[ScoredResult],
    right: &[ScoredResult],
) -> String {
    let mut table = String::new();
    let header_left = format!("Query 1: {}", truncate_str(first_query, 20));
    let header_right = format!("Query 2: {}", truncate_str(second_query, 20));
    table.push_str(&format!(
        "{header_left:<width$} | {header_right}\n",
        width = COLUMN_WIDTH
    ));
    table.push_str(&"-".repeat(60));
    table.push('\n');

    let rows = left.len().max(right.len()).min(COMPARISON_ROWS);
    for i in 0..rows {
        let cell = |results: &[ScoredResult]| {
            results.get(i).map_or_else(
                || "---".to_string(),
                |r| format!("{} ({:.0}%)", r.item.name, r.score * 100.0),
            )
        };
        let left_cell: String = cell(left).chars().take(COLUMN_WIDTH).collect();
        let right_cell: String = cell(right).chars().take(COLUMN_WIDTH).collect();
        table.push_str(&format!(
            "{left_cell:<width$} | {right_cell}\n",
            width = COLUMN_WIDTH
        ));
    }
    table
}

pub fn print_comparison(first_query: &str, second_query: &str, response: &ComparisonResponse) {
    println!("\n🤖 AI Analysis: {}", response.text);
    println!("\n📊 DETAILED COMPARISON");
    println!("{}", "=".repeat(60));
    print!(
        "{}",
        format_comparison_table(first_query, second_query, &response.left, &response.right)
    );
}

pub fn print_history(turns: &[ConversationTurn]) {
    if turns.is_empty() {
        print_info("No questions asked yet");
        return;
    }
    println!("\n🕘 Recent questions:");
    for turn in turns {
        println!(
            "  #{} [{}] {}",
            turn.sequence + 1,
            turn.at.format("%H:%M:%S"),
            turn.input
        );
    }
}

pub fn print_health(health: &IndexHealth) {
    println!("🩺 Index health:");
    println!("  Items: {}", health.item_count);
    println!("  Dimension: {}", health.dimension);
    if health.is_healthy() {
        print_success("Index is ready for search");
    } else {
        for issue in &health.issues {
            print_warning(issue);
        }
    }
}

pub fn print_chat_help() {
    println!("\n📖 FOOD RECOMMENDATION CHAT HELP");
    println!("{}", "=".repeat(45));
    println!("Describe what you are in the mood for, for example:");
    println!("  • 'healthy Italian pasta under 350 calories'");
    println!("  • 'spicy comfort food for cold weather'");
    println!("  • 'light breakfast for busy morning'");
    println!("\nCommands:");
    println!("  • 'compare' - compare recommendations for two queries");
    println!("  • 'history' - show your recent questions");
    println!("  • 'help'    - show this help menu");
    println!("  • 'quit'    - exit the chat");
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 foodrag Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    if let Some(dir) = &config.logging.directory {
        println!("  Directory: {}", dir.display());
    }
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  Key: {}", mask_key(config.llm_key()));
    println!(
        "  Decoding: max_length={} temperature={} top_p={} do_sample={}",
        config.generation.max_length,
        config.generation.temperature,
        config.generation.top_p,
        config.generation.do_sample
    );
    println!("  Timeout: {}s", config.generation.timeout_secs);
    println!();

    println!("🔍 Retrieval:");
    println!("  Default k: {}", config.retrieval.default_k);
    println!("  Similarity floor: {}", config.retrieval.similarity_floor);
    println!("  Context items: {}", config.retrieval.context_items);
    println!();

    println!("💬 Conversation:");
    println!("  History capacity: {}", config.conversation.history_capacity);
    println!("  Dataset: {}", config.dataset_path().display());
}

/// Hide all but the first four characters of a secret
fn mask_key(key: &str) -> String {
    if key.chars().count() <= 8 {
        return key.to_string();
    }
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}***")
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}
