//! Information display handlers (health, config)

use crate::cli::output::*;
use crate::errors::FoodRagError;
use crate::AppConfig;
use crate::FoodRag;
use crate::Result;

/// Report index health and check the embedding provider answers
pub async fn handle_health(app: &FoodRag) -> Result<()> {
    let health = app.index_health().await;
    print_health(&health);

    let embeddings = app.embeddings();
    match embeddings.embed("health check").await {
        Ok(vector) if vector.len() == embeddings.dimension() => {
            print_success(&format!("Embedding provider ok ({} dims)", vector.len()));
        }
        Ok(vector) => {
            print_warning(&format!(
                "Embedding provider returned {} dims, expected {}",
                vector.len(),
                embeddings.dimension()
            ));
        }
        Err(e) => print_error(&format!("Embedding provider unavailable: {e}")),
    }

    if health.is_healthy() {
        Ok(())
    } else {
        Err(FoodRagError::IndexError(health.issues.join("; ")))
    }
}

pub fn handle_config(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
