//! Food dataset loading and index population

use std::path::Path;

use futures::stream;
use futures::stream::StreamExt;
use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::embeddings::EmbeddingProvider;
use crate::errors::FoodRagError;
use crate::errors::Result;
use crate::index::SimilarityIndex;
use crate::models::FoodItem;

/// One entry as it appears in the dataset file
#[derive(Debug, Deserialize)]
struct RawFoodEntry {
    food_name: Option<String>,
    cuisine_type: Option<String>,
    food_description: Option<String>,
    #[serde(default)]
    food_calories_per_serving: Option<RawCalories>,
    #[serde(default)]
    food_ingredients: Option<RawIngredients>,
    #[serde(default)]
    food_health_benefits: Option<String>,
    #[serde(default)]
    cooking_method: Option<String>,
    #[serde(default)]
    taste_profile: Option<String>,
}

/// Ingredients are either a list or a single free-text string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIngredients {
    List(Vec<String>),
    Text(String),
}

impl RawIngredients {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Text(text) if text.trim().is_empty() => Vec::new(),
            Self::Text(text) => vec![text.trim().to_string()],
        }
    }
}

/// Calories as a JSON number or a numeric string; fractions are truncated
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCalories {
    Number(f64),
    Text(String),
}

impl RawCalories {
    fn to_calories(&self) -> Option<u32> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
            return None;
        }
        Some(value.trunc() as u32)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Load and validate the food dataset.
///
/// Entries without a name, cuisine or description (or that are not objects
/// at all) are skipped with a warning. Ids are `food_{n}` over the kept
/// entries.
///
/// # Errors
/// - The file cannot be read
/// - The file is not a JSON array
/// - No valid entries remain
pub fn load_food_data<P: AsRef<Path>>(path: P) -> Result<Vec<FoodItem>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        FoodRagError::DatasetError(format!("Cannot read {}: {e}", path.display()))
    })?;
    let items = parse_food_data(&content)?;
    info!("Loaded {} food items from {}", items.len(), path.display());
    Ok(items)
}

/// Parse dataset JSON already in memory
pub fn parse_food_data(content: &str) -> Result<Vec<FoodItem>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(FoodRagError::DatasetError(
            "Dataset must be a JSON array of food items".to_string(),
        ));
    };

    let mut items = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let raw: RawFoodEntry = match serde_json::from_value(entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping dataset entry {}: {}", position, e);
                continue;
            }
        };

        let (Some(name), Some(cuisine), Some(description)) = (
            non_blank(raw.food_name),
            non_blank(raw.cuisine_type),
            non_blank(raw.food_description),
        ) else {
            warn!("Skipping dataset entry {}: missing required fields", position);
            continue;
        };

        let calories = match &raw.food_calories_per_serving {
            None => 0,
            Some(raw_calories) => match raw_calories.to_calories() {
                Some(calories) => calories,
                None => {
                    warn!(
                        "Skipping dataset entry {}: invalid calories {:?}",
                        position, raw_calories
                    );
                    continue;
                }
            },
        };

        items.push(FoodItem {
            id: format!("food_{}", items.len()),
            name,
            cuisine,
            description,
            calories,
            ingredients: raw
                .food_ingredients
                .map(RawIngredients::into_list)
                .unwrap_or_default(),
            health_benefits: non_blank(raw.food_health_benefits),
            cooking_method: non_blank(raw.cooking_method),
            taste_profile: non_blank(raw.taste_profile),
        });
    }

    if items.is_empty() {
        return Err(FoodRagError::DatasetError(
            "No valid food items found in dataset".to_string(),
        ));
    }
    Ok(items)
}

/// Embedding requests in flight while indexing
const EMBED_CONCURRENCY: usize = 8;

/// Embed every item's searchable text and add it to the index.
///
/// Embeddings are computed concurrently but items are added in input order.
/// Returns the number of items added.
pub async fn index_items(
    embeddings: &dyn EmbeddingProvider,
    index: &dyn SimilarityIndex,
    items: Vec<FoodItem>,
) -> Result<usize> {
    if items.is_empty() {
        return Err(FoodRagError::DatasetError(
            "No food items to index".to_string(),
        ));
    }

    let total = items.len();
    info!("Generating embeddings for {} food items...", total);

    let mut embedded = stream::iter(items)
        .map(|item| async move {
            let vector = embeddings.embed(&item.searchable_text()).await;
            (item, vector)
        })
        .buffered(EMBED_CONCURRENCY);

    let mut added = 0;
    while let Some((item, vector)) = embedded.next().await {
        index.add(item, vector?).await?;
        added += 1;
        if added % 50 == 0 {
            debug!("Indexed {}/{} items", added, total);
        }
    }

    info!("Indexed {} food items", total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::embeddings::HashingEmbedder;
    use crate::index::InMemoryIndex;

    const SAMPLE: &str = r#"[
        {
            "food_name": "  Chicken Tikka Masala ",
            "cuisine_type": "Indian",
            "food_description": "Grilled chicken in a creamy spiced tomato sauce",
            "food_calories_per_serving": 490,
            "food_ingredients": ["chicken", "yogurt", "tomato", " "],
            "food_health_benefits": "High in protein",
            "cooking_method": "Grilled then simmered",
            "taste_profile": "Rich and spicy"
        },
        {
            "food_name": "Nameless",
            "cuisine_type": "",
            "food_description": "Missing cuisine"
        },
        "not an object",
        {
            "food_name": "Miso Soup",
            "cuisine_type": "Japanese",
            "food_description": "Light soybean broth",
            "food_ingredients": "miso, tofu, seaweed"
        }
    ]"#;

    #[test]
    fn test_parse_skips_invalid_entries() {
        let items = parse_food_data(SAMPLE).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].id, "food_0");
        assert_eq!(items[0].name, "Chicken Tikka Masala");
        assert_eq!(items[0].ingredients, vec!["chicken", "yogurt", "tomato"]);
        assert_eq!(items[0].taste_profile.as_deref(), Some("Rich and spicy"));

        assert_eq!(items[1].id, "food_1");
        assert_eq!(items[1].calories, 0);
        assert_eq!(items[1].ingredients, vec!["miso, tofu, seaweed"]);
        assert!(items[1].cooking_method.is_none());
    }

    #[test]
    fn test_parse_accepts_numeric_calorie_strings() {
        let items = parse_food_data(
            r#"[
                {"food_name": "Pad Thai", "cuisine_type": "Thai",
                 "food_description": "Stir-fried noodles", "food_calories_per_serving": "540"},
                {"food_name": "Gyoza", "cuisine_type": "Japanese",
                 "food_description": "Pan-fried dumplings", "food_calories_per_serving": 280.7},
                {"food_name": "Mystery Stew", "cuisine_type": "Unknown",
                 "food_description": "Who knows", "food_calories_per_serving": "lots"},
                {"food_name": "Ice", "cuisine_type": "None",
                 "food_description": "Frozen water", "food_calories_per_serving": -5}
            ]"#,
        )
        .unwrap();

        let calories: Vec<(&str, u32)> = items
            .iter()
            .map(|item| (item.name.as_str(), item.calories))
            .collect();
        assert_eq!(calories, vec![("Pad Thai", 540), ("Gyoza", 280)]);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_food_data(r#"{"food_name": "x"}"#).unwrap_err();
        assert!(matches!(err, FoodRagError::DatasetError(_)));
        assert!(parse_food_data("[]").is_err());
        assert!(matches!(
            parse_food_data("not json").unwrap_err(),
            FoodRagError::Serialization(_)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let items = load_food_data(file.path()).unwrap();
        assert_eq!(items.len(), 2);

        let missing = load_food_data("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, FoodRagError::DatasetError(_)));
    }

    #[tokio::test]
    async fn test_index_items() {
        let items = parse_food_data(SAMPLE).unwrap();
        let embedder = HashingEmbedder::new(64).unwrap();
        let index = InMemoryIndex::new(64);

        let added = index_items(&embedder, &index, items).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(index.len().await, 2);

        assert!(index_items(&embedder, &index, Vec::new()).await.is_err());
    }
}
