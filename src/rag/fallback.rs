//! Deterministic template answers used whenever generation is unavailable.
//!
//! Nothing here calls out of the process, so the pipeline can always answer.

use crate::models::ScoredResult;

/// Answer for a single query from its ranked results
pub fn fallback(query: &str, results: &[ScoredResult]) -> String {
    match results.first() {
        None => no_match(query),
        Some(top) => format!(
            "Based on your request for '{query}', I recommend {}, {} {} dish with {} calories per serving.",
            top.item.name,
            indefinite_article(&top.item.cuisine),
            top.item.cuisine,
            top.item.calories
        ),
    }
}

/// "an" before a vowel sound we can spot from spelling, "a" otherwise
fn indefinite_article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Answer used when nothing cleared the similarity floor
pub fn no_match(query: &str) -> String {
    format!(
        "I couldn't find any food items matching '{query}'. Try describing what you're in the mood for with different words!"
    )
}

/// Answer for a comparison from both sides' ranked results
pub fn comparison_fallback(
    first_query: &str,
    first: &[ScoredResult],
    second_query: &str,
    second: &[ScoredResult],
) -> String {
    match (first.first(), second.first()) {
        (Some(a), Some(b)) => format!(
            "For '{first_query}', I recommend {}. For '{second_query}', {} would be perfect.",
            a.item.name, b.item.name
        ),
        (None, Some(_)) => {
            format!("Found results for '{second_query}' but none for '{first_query}'.")
        }
        (Some(_), None) => {
            format!("Found results for '{first_query}' but none for '{second_query}'.")
        }
        (None, None) => {
            format!("No results found for either '{first_query}' or '{second_query}'.")
        }
    }
}
