//! Recipe rows and the display shape served to the dashboard feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preferences::{DietaryFlags, UserPreferences};

/// Number of recipes in the recommendation feed
pub const FEED_SIZE: i64 = 6;

/// Recipe row joined with its review aggregate
#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_time_minutes: Option<i32>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub difficulty_level: Option<i32>,
    pub calories_per_serving: Option<i32>,
    pub protein_per_serving: Option<i32>,
    pub carbs_per_serving: Option<i32>,
    pub fat_per_serving: Option<i32>,
    pub servings: Option<i32>,
    pub cuisine_type: Option<String>,
    pub dietary_tags: Option<Vec<String>>,
    pub instructions: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    /// `None` when the recipe has no reviews
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_level(level: Option<i32>) -> Self {
        match level {
            Some(1) => Difficulty::Easy,
            Some(2) => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

/// Display-ready recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    /// Total time in minutes, 0 when unknown
    pub cooking_time: i32,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub difficulty: Difficulty,
    pub calories: i32,
    pub macros: Macros,
    pub servings: Option<i32>,
    pub category: Vec<String>,
    pub instructions: Vec<String>,
    pub dietary_info: DietaryFlags,
    /// Mean review rating rounded to one decimal; `None` without reviews
    pub rating: Option<f64>,
    pub review_count: i64,
}

fn instruction_steps(value: Option<&serde_json::Value>) -> Vec<String> {
    match value {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(serde_json::Value::Array(steps)) => steps
            .iter()
            .map(|step| match step {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(serde_json::Value::String(s)) => vec![s.clone()],
        Some(other) => vec![other.to_string()],
    }
}

impl From<RecipeRow> for DisplayRecipe {
    fn from(row: RecipeRow) -> Self {
        let tags = row.dietary_tags.unwrap_or_default();
        let rating = if row.review_count > 0 {
            row.average_rating.map(|avg| (avg * 10.0).round() / 10.0)
        } else {
            None
        };

        Self {
            id: row.id.to_string(),
            title: row.name,
            description: row.description.unwrap_or_default(),
            image: row.image_url,
            cooking_time: row.total_time_minutes.unwrap_or(0),
            prep_time: row.prep_time_minutes,
            cook_time: row.cook_time_minutes,
            difficulty: Difficulty::from_level(row.difficulty_level),
            calories: row.calories_per_serving.unwrap_or(0),
            macros: Macros {
                protein: row.protein_per_serving.unwrap_or(0),
                carbs: row.carbs_per_serving.unwrap_or(0),
                fat: row.fat_per_serving.unwrap_or(0),
            },
            servings: row.servings,
            category: match row.cuisine_type {
                Some(cuisine) if !cuisine.is_empty() => vec![cuisine],
                _ => vec!["other".to_string()],
            },
            instructions: instruction_steps(row.instructions.as_ref()),
            dietary_info: DietaryFlags::from_tags(&tags),
            rating,
            review_count: row.review_count,
        }
    }
}

/// Shape a fetched page of recipes, keeping the fetch order
pub fn shape_recipes(rows: Vec<RecipeRow>) -> Vec<DisplayRecipe> {
    rows.into_iter().map(DisplayRecipe::from).collect()
}

/// Filter applied by the recipe fetcher
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    /// Recipes without a recorded total time always pass
    pub max_total_time: Option<i32>,
    /// Empty means any cuisine
    pub cuisines: Vec<String>,
    /// Tags a recipe must carry
    pub required_tags: Vec<String>,
    pub limit: i64,
}

impl RecipeQuery {
    pub fn for_preferences(preferences: &UserPreferences) -> Self {
        Self {
            max_total_time: Some(preferences.preferred_cooking_time),
            cuisines: preferences.favorite_categories.clone(),
            required_tags: preferences.dietary_restrictions.to_tags(),
            limit: FEED_SIZE,
        }
    }

    /// Newest recipes, unfiltered
    pub fn newest() -> Self {
        Self {
            max_total_time: None,
            cuisines: Vec::new(),
            required_tags: Vec::new(),
            limit: FEED_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::{CookingSkill, UserPreferences};
    use serde_json::json;

    fn row(id: i64) -> RecipeRow {
        RecipeRow {
            id,
            name: "Dal Tadka".to_string(),
            description: None,
            image_url: None,
            total_time_minutes: None,
            prep_time_minutes: Some(10),
            cook_time_minutes: Some(25),
            difficulty_level: Some(1),
            calories_per_serving: Some(320),
            protein_per_serving: Some(14),
            carbs_per_serving: None,
            fat_per_serving: Some(9),
            servings: Some(4),
            cuisine_type: Some("north_indian".to_string()),
            dietary_tags: Some(vec!["vegetarian".to_string(), "gluten-free".to_string()]),
            instructions: Some(json!(["Rinse lentils", "Simmer", 3])),
            created_at: Utc::now(),
            average_rating: None,
            review_count: 0,
        }
    }

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::from_level(Some(1)), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(Some(2)), Difficulty::Medium);
        assert_eq!(Difficulty::from_level(Some(3)), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(Some(0)), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(None), Difficulty::Hard);
    }

    #[test]
    fn test_shape_recipe() {
        let recipe = DisplayRecipe::from(row(42));

        assert_eq!(recipe.id, "42");
        assert_eq!(recipe.title, "Dal Tadka");
        assert_eq!(recipe.description, "");
        assert_eq!(recipe.cooking_time, 0);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.calories, 320);
        assert_eq!(recipe.macros.carbs, 0);
        assert_eq!(recipe.category, vec!["north_indian".to_string()]);
        assert_eq!(recipe.instructions, vec!["Rinse lentils", "Simmer", "3"]);
        assert!(recipe.dietary_info.vegetarian);
        assert!(recipe.dietary_info.gluten_free);
        assert!(!recipe.dietary_info.vegan);
    }

    #[test]
    fn test_missing_cuisine_is_other() {
        let mut raw = row(1);
        raw.cuisine_type = None;
        assert_eq!(DisplayRecipe::from(raw).category, vec!["other".to_string()]);
    }

    #[test]
    fn test_rating_is_unavailable_without_reviews() {
        let recipe = DisplayRecipe::from(row(1));
        assert_eq!(recipe.rating, None);
        assert_eq!(recipe.review_count, 0);

        let json = serde_json::to_value(&recipe).unwrap();
        assert!(json["rating"].is_null());
    }

    #[test]
    fn test_rating_is_rounded_aggregate() {
        let mut raw = row(1);
        raw.average_rating = Some(4.333_333);
        raw.review_count = 3;

        let recipe = DisplayRecipe::from(raw);
        assert_eq!(recipe.rating, Some(4.3));
        assert_eq!(recipe.review_count, 3);
    }

    #[test]
    fn test_shaping_keeps_order() {
        let ids: Vec<String> = shape_recipes(vec![row(3), row(1), row(2)])
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_query_from_preferences() {
        let preferences = UserPreferences {
            dietary_restrictions: DietaryFlags {
                vegan: true,
                dairy_free: true,
                ..Default::default()
            },
            favorite_categories: vec!["italian".to_string()],
            cooking_skill_level: CookingSkill::Beginner,
            preferred_cooking_time: 30,
            calorie_preference: None,
        };

        let query = RecipeQuery::for_preferences(&preferences);
        assert_eq!(query.max_total_time, Some(30));
        assert_eq!(query.cuisines, vec!["italian".to_string()]);
        assert_eq!(
            query.required_tags,
            vec!["vegan".to_string(), "dairy-free".to_string()]
        );
        assert_eq!(query.limit, 6);

        assert_eq!(RecipeQuery::newest().max_total_time, None);
    }
}
