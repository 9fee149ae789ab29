//! Search handler

use crate::cli::output::*;
use crate::models::ItemFilter;
use crate::models::RetrievalRequest;
use crate::FoodRag;
use crate::Result;

pub async fn handle_search(
    app: &FoodRag,
    query: String,
    limit: usize,
    floor: f32,
    cuisine: Option<String>,
    max_calories: Option<u32>,
) -> Result<()> {
    let filter = ItemFilter {
        cuisine,
        max_calories,
    };
    print_search_header(&query, &filter.describe());

    let request = RetrievalRequest::new(query)
        .with_k(limit)
        .with_floor(floor)
        .with_filter(filter);

    match app.retriever().retrieve_request(&request).await {
        Ok(results) => {
            print_results(&results);
            print_related_searches(&results);
            Ok(())
        }
        Err(e) if e.is_retrieval_failure() => {
            print_error(&e.user_message());
            Err(e)
        }
        Err(e) => Err(e),
    }
}
