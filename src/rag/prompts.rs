//! Prompt templates for food recommendation

/// Build the recommendation prompt from the user's request and the rendered context
pub fn build_recommendation_prompt(query: &str, context: &str) -> String {
    format!("User wants: {query}\nAvailable foods: {context}\nRecommend 2-3 foods and explain why:")
}

/// Build the prompt contrasting the best match of two queries
pub fn build_comparison_prompt(
    first_query: &str,
    first_match: &str,
    second_query: &str,
    second_match: &str,
) -> String {
    format!(
        "Compare: '{first_query}' (best match: {first_match}) vs '{second_query}' (best match: {second_match}). Which is better and why?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_prompt() {
        assert_eq!(
            build_recommendation_prompt("spicy pasta", "Penne Arrabbiata (Italian, 380 cal)"),
            "User wants: spicy pasta\nAvailable foods: Penne Arrabbiata (Italian, 380 cal)\nRecommend 2-3 foods and explain why:"
        );
    }

    #[test]
    fn test_comparison_prompt() {
        let prompt = build_comparison_prompt("light lunch", "Miso Soup", "comfort food", "Lasagna");
        assert_eq!(
            prompt,
            "Compare: 'light lunch' (best match: Miso Soup) vs 'comfort food' (best match: Lasagna). Which is better and why?"
        );
    }
}
