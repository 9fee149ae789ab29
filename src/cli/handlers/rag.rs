//! RAG (Retrieval-Augmented Generation) handlers

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::output::*;
use crate::FoodRag;
use crate::Result;

/// Answer one request. Ctrl+C while the model is thinking answers from the
/// retrieved items instead of waiting.
pub async fn handle_ask(app: &FoodRag, query: String, verbose: bool) -> Result<()> {
    let orchestrator = app.orchestrator()?;
    print_info(&format!("🔍 Searching for: '{query}'"));

    let cancel = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(&cancel);
    let outcome = orchestrator.handle_query_with_cancel(&query, &cancel).await;
    watcher.abort();

    match outcome {
        Ok(response) => {
            print_chat_response(&response, verbose);
            Ok(())
        }
        Err(e) => {
            print_error(&e.user_message());
            Err(e)
        }
    }
}

/// Cancel `cancel` on the first Ctrl+C; abort the handle once the request is done
fn cancel_on_ctrl_c(cancel: &CancellationToken) -> JoinHandle<()> {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, answering without the model");
            cancel.cancel();
        }
    })
}

/// Compare two requests; Ctrl+C during generation answers from the retrieved items
pub async fn handle_compare(app: &FoodRag, first: String, second: String) -> Result<()> {
    if first.trim().is_empty() || second.trim().is_empty() {
        print_error("Please enter both queries for comparison");
        return Ok(());
    }

    let orchestrator = app.orchestrator()?;
    print_info(&format!("🔍 Analyzing '{first}' vs '{second}'..."));

    let cancel = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(&cancel);
    let outcome = orchestrator
        .handle_comparison_with_cancel(&first, &second, &cancel)
        .await;
    watcher.abort();

    match outcome {
        Ok(response) => {
            print_comparison(&first, &second, &response);
            Ok(())
        }
        Err(e) => {
            print_error(&e.user_message());
            Err(e)
        }
    }
}
