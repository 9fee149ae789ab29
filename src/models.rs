use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::config::MAX_RESULTS_CAP;

/// Default number of results requested per query
pub const DEFAULT_RESULT_COUNT: usize = 5;

/// A food item as loaded from the dataset. Immutable once indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub description: String,
    pub calories: u32,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub health_benefits: Option<String>,
    #[serde(default)]
    pub cooking_method: Option<String>,
    #[serde(default)]
    pub taste_profile: Option<String>,
}

impl FoodItem {
    /// Text used to embed this item: name, cuisine, description, then the
    /// optional ingredients, taste profile and cooking method.
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![
            self.name.as_str(),
            self.cuisine.as_str(),
            self.description.as_str(),
        ];
        let ingredients = self.ingredients.join(" ");
        if !ingredients.is_empty() {
            parts.push(&ingredients);
        }
        if let Some(taste) = self.taste_profile.as_deref().filter(|s| !s.is_empty()) {
            parts.push(taste);
        }
        if let Some(method) = self.cooking_method.as_deref().filter(|s| !s.is_empty()) {
            parts.push(method);
        }
        parts.join(" ")
    }
}

/// A retrieved item with its similarity to the query
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub item: Arc<FoodItem>,
    /// Similarity in [0, 1], 1 meaning identical
    pub score: f32,
    /// 0-based position in the index's answer
    pub rank: usize,
}

impl ScoredResult {
    pub fn name(&self) -> &str {
        &self.item.name
    }

    pub fn cuisine(&self) -> &str {
        &self.item.cuisine
    }
}

/// Restricts which items an index may return
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive cuisine match
    pub cuisine: Option<String>,
    /// Inclusive calorie ceiling
    pub max_calories: Option<u32>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.max_calories.is_none()
    }

    pub fn matches(&self, item: &FoodItem) -> bool {
        if let Some(cuisine) = &self.cuisine {
            if !item.cuisine.eq_ignore_ascii_case(cuisine.trim()) {
                return false;
            }
        }
        if let Some(max) = self.max_calories {
            if item.calories > max {
                return false;
            }
        }
        true
    }

    /// Human readable description, e.g. "cuisine: Thai, max calories: 400"
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cuisine) = &self.cuisine {
            parts.push(format!("cuisine: {cuisine}"));
        }
        if let Some(max) = self.max_calories {
            parts.push(format!("max calories: {max}"));
        }
        if parts.is_empty() {
            "no filters".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A single retrieval request
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub query: String,
    pub k: usize,
    pub floor: f32,
    pub filter: ItemFilter,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            k: DEFAULT_RESULT_COUNT,
            floor: 0.0,
            filter: ItemFilter::default(),
        }
    }

    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    #[must_use]
    pub fn with_floor(mut self, floor: f32) -> Self {
        self.floor = floor;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: ItemFilter) -> Self {
        self.filter = filter;
        self
    }

    /// `k` clamped to the hard cap
    pub fn effective_k(&self) -> usize {
        self.k.min(MAX_RESULTS_CAP)
    }
}

/// One recorded user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub sequence: u64,
    pub input: String,
    pub at: DateTime<Utc>,
}

/// Two independent queries to contrast
#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub first: String,
    pub second: String,
}

impl ComparisonRequest {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}
