//! Stored preference profile (`user_profiles` row) and its vocabularies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw preference record as stored; every preference column is optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub primary_goal: Option<String>,
    pub target_calories: Option<i32>,
    pub target_protein: Option<i32>,
    pub food_type: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub preferred_cuisines: Option<Vec<String>>,
    pub spice_level: Option<i32>,
    pub cooking_time_preference: Option<String>,
    pub skill_level: Option<i32>,
    pub household_size: Option<i32>,
    pub budget_per_meal_min: Option<i32>,
    pub budget_per_meal_max: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a profile; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub primary_goal: Option<String>,
    pub target_calories: Option<i32>,
    pub target_protein: Option<i32>,
    pub food_type: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub preferred_cuisines: Option<Vec<String>>,
    pub spice_level: Option<i32>,
    pub cooking_time_preference: Option<String>,
    pub skill_level: Option<i32>,
    pub household_size: Option<i32>,
    pub budget_per_meal_min: Option<i32>,
    pub budget_per_meal_max: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    WeightLoss,
    MuscleBuilding,
    HealthyLiving,
    QuickMeals,
    FamilyCooking,
}

impl PrimaryGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryGoal::WeightLoss => "weight_loss",
            PrimaryGoal::MuscleBuilding => "muscle_building",
            PrimaryGoal::HealthyLiving => "healthy_living",
            PrimaryGoal::QuickMeals => "quick_meals",
            PrimaryGoal::FamilyCooking => "family_cooking",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryGoal::WeightLoss => "Weight Loss",
            PrimaryGoal::MuscleBuilding => "Muscle Building",
            PrimaryGoal::HealthyLiving => "Healthy Living",
            PrimaryGoal::QuickMeals => "Quick Meals",
            PrimaryGoal::FamilyCooking => "Family Cooking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    Vegetarian,
    NonVegetarian,
    Vegan,
}

impl FoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodType::Vegetarian => "vegetarian",
            FoodType::NonVegetarian => "non_vegetarian",
            FoodType::Vegan => "vegan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodType::Vegetarian => "Vegetarian",
            FoodType::NonVegetarian => "Non-Vegetarian",
            FoodType::Vegan => "Vegan",
        }
    }
}

/// Usual cooking time bucket picked during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingTime {
    Quick,
    Medium,
    Long,
    Variable,
}

impl CookingTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTime::Quick => "quick",
            CookingTime::Medium => "medium",
            CookingTime::Long => "long",
            CookingTime::Variable => "variable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CookingTime::Quick => "Quick (15-30 min)",
            CookingTime::Medium => "Moderate (30-60 min)",
            CookingTime::Long => "Elaborate (60+ min)",
            CookingTime::Variable => "Variable (depends on mood)",
        }
    }
}

/// Cuisines offered by the wizard. Stored values outside this list are kept
/// as-is.
pub const CUISINES: &[(&str, &str)] = &[
    ("north_indian", "North Indian"),
    ("south_indian", "South Indian"),
    ("continental", "Continental"),
    ("chinese", "Chinese"),
    ("italian", "Italian"),
    ("mediterranean", "Mediterranean"),
];

/// Display label of a cuisine id, falling back to the id itself
pub fn cuisine_label(id: &str) -> &str {
    CUISINES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, label)| *label)
        .unwrap_or(id)
}

pub fn spice_label(level: u8) -> &'static str {
    match level {
        1 => "Mild",
        2 => "Light",
        3 => "Medium",
        4 => "Hot",
        _ => "Very Hot",
    }
}

pub fn skill_label(level: u8) -> &'static str {
    match level {
        1 => "Beginner",
        2 => "Learning",
        3 => "Intermediate",
        4 => "Advanced",
        _ => "Expert",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names_match_storage() {
        assert_eq!(
            serde_json::to_value(PrimaryGoal::MuscleBuilding).unwrap(),
            PrimaryGoal::MuscleBuilding.as_str()
        );
        assert_eq!(
            serde_json::to_value(FoodType::NonVegetarian).unwrap(),
            FoodType::NonVegetarian.as_str()
        );
        assert_eq!(
            serde_json::to_value(CookingTime::Variable).unwrap(),
            CookingTime::Variable.as_str()
        );
    }

    #[test]
    fn test_cuisine_label_falls_back_to_id() {
        assert_eq!(cuisine_label("south_indian"), "South Indian");
        assert_eq!(cuisine_label("thai"), "thai");
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(spice_label(1), "Mild");
        assert_eq!(spice_label(5), "Very Hot");
        assert_eq!(skill_label(2), "Learning");
        assert_eq!(skill_label(5), "Expert");
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            city: Some("Pune".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
