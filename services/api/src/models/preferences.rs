//! Typed view of the stored preference profile
//!
//! [`UserPreferences::from_profile`] turns the nullable storage columns into
//! a fully populated view model, and [`PreferenceUpdate::to_profile_update`]
//! maps a settings edit back onto storage columns. Going through both and
//! normalizing again yields the same view model.

use serde::{Deserialize, Serialize};

use super::profile::{ProfileUpdate, UserProfile};

/// Ceiling used when no cooking time bucket is stored
pub const DEFAULT_COOKING_TIME_CEILING: i32 = 60;

const VEGETARIAN: &str = "vegetarian";
const VEGAN: &str = "vegan";
const GLUTEN_FREE: &str = "gluten-free";
const DAIRY_FREE: &str = "dairy-free";

/// Dietary flags derived from a tag list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
}

impl DietaryFlags {
    pub fn from_tags(tags: &[String]) -> Self {
        let has = |tag: &str| tags.iter().any(|t| t == tag);
        Self {
            vegetarian: has(VEGETARIAN),
            vegan: has(VEGAN),
            gluten_free: has(GLUTEN_FREE),
            dairy_free: has(DAIRY_FREE),
        }
    }

    /// Tags for the flags that are set, in a fixed order
    pub fn to_tags(&self) -> Vec<String> {
        [
            (self.vegetarian, VEGETARIAN),
            (self.vegan, VEGAN),
            (self.gluten_free, GLUTEN_FREE),
            (self.dairy_free, DAIRY_FREE),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, tag)| tag.to_string())
        .collect()
    }

    /// Replace the flag tags in `existing`, keeping any other restriction
    /// (for example an allergy-style "nut-free") untouched
    pub fn merge_into(&self, existing: &[String]) -> Vec<String> {
        let mut tags: Vec<String> = existing
            .iter()
            .filter(|t| ![VEGETARIAN, VEGAN, GLUTEN_FREE, DAIRY_FREE].contains(&t.as_str()))
            .cloned()
            .collect();
        tags.extend(self.to_tags());
        tags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingSkill {
    Beginner,
    Intermediate,
    Advanced,
}

impl CookingSkill {
    /// Stored levels 1 and 2 map to the first two labels, anything higher is
    /// advanced. Without a stored level the middle label is used.
    pub fn from_level(level: Option<i32>) -> Self {
        match level {
            Some(1) => CookingSkill::Beginner,
            Some(2) => CookingSkill::Intermediate,
            Some(_) => CookingSkill::Advanced,
            None => CookingSkill::Intermediate,
        }
    }

    pub fn level(&self) -> i32 {
        match self {
            CookingSkill::Beginner => 1,
            CookingSkill::Intermediate => 2,
            CookingSkill::Advanced => 3,
        }
    }
}

/// Maximum total cooking time, in minutes, for a stored bucket
pub fn cooking_time_ceiling(bucket: Option<&str>) -> i32 {
    match bucket {
        Some("quick") => 30,
        Some("medium") => 60,
        Some(_) => 120,
        None => DEFAULT_COOKING_TIME_CEILING,
    }
}

/// Bucket to store for a cooking time ceiling
pub fn cooking_time_bucket(ceiling: i32) -> &'static str {
    if ceiling <= 30 {
        "quick"
    } else if ceiling <= 60 {
        "medium"
    } else {
        "long"
    }
}

/// Calorie window around a daily target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieRange {
    pub min: i32,
    pub max: i32,
}

impl CalorieRange {
    /// ±20% around `target`
    pub fn around(target: i32) -> Self {
        let spread = target / 5;
        Self {
            min: target - spread,
            max: target + spread,
        }
    }

    pub fn target(&self) -> i32 {
        self.min + (self.max - self.min) / 2
    }
}

/// Preference view model consumed by the recipe feed and the settings page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub dietary_restrictions: DietaryFlags,
    pub favorite_categories: Vec<String>,
    pub cooking_skill_level: CookingSkill,
    /// Maximum cooking time in minutes
    pub preferred_cooking_time: i32,
    pub calorie_preference: Option<CalorieRange>,
}

impl UserPreferences {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            dietary_restrictions: DietaryFlags::from_tags(
                profile.dietary_restrictions.as_deref().unwrap_or_default(),
            ),
            favorite_categories: profile.preferred_cuisines.clone().unwrap_or_default(),
            cooking_skill_level: CookingSkill::from_level(profile.skill_level),
            preferred_cooking_time: cooking_time_ceiling(
                profile.cooking_time_preference.as_deref(),
            ),
            calorie_preference: profile.target_calories.map(CalorieRange::around),
        }
    }
}

/// Partial settings edit expressed in view-model terms
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceUpdate {
    pub dietary_restrictions: Option<DietaryFlags>,
    pub favorite_categories: Option<Vec<String>>,
    pub cooking_skill_level: Option<CookingSkill>,
    pub preferred_cooking_time: Option<i32>,
    pub calorie_preference: Option<CalorieRange>,
}

impl PreferenceUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(minutes) = self.preferred_cooking_time {
            if minutes <= 0 {
                return Err("Preferred cooking time must be positive".to_string());
            }
        }

        if let Some(range) = &self.calorie_preference {
            if range.min <= 0 || range.min > range.max {
                return Err("Calorie preference must satisfy 0 < min <= max".to_string());
            }
        }

        if let Some(categories) = &self.favorite_categories {
            if categories.iter().any(|c| c.trim().is_empty()) {
                return Err("Favorite categories cannot be blank".to_string());
            }
        }

        Ok(())
    }

    /// Storage columns to write for this edit, given the current profile
    pub fn to_profile_update(&self, current: &UserProfile) -> ProfileUpdate {
        ProfileUpdate {
            dietary_restrictions: self.dietary_restrictions.map(|flags| {
                flags.merge_into(current.dietary_restrictions.as_deref().unwrap_or_default())
            }),
            preferred_cuisines: self.favorite_categories.clone(),
            cooking_time_preference: self
                .preferred_cooking_time
                .map(|minutes| cooking_time_bucket(minutes).to_string()),
            skill_level: self.cooking_skill_level.map(|skill| skill.level()),
            target_calories: self.calorie_preference.map(|range| range.target()),
            ..Default::default()
        }
    }
}

impl From<&UserPreferences> for PreferenceUpdate {
    fn from(preferences: &UserPreferences) -> Self {
        Self {
            dietary_restrictions: Some(preferences.dietary_restrictions),
            favorite_categories: Some(preferences.favorite_categories.clone()),
            cooking_skill_level: Some(preferences.cooking_skill_level),
            preferred_cooking_time: Some(preferences.preferred_cooking_time),
            calorie_preference: preferences.calorie_preference,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    pub(crate) fn empty_profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            email: "cook@example.com".to_string(),
            full_name: Some("Home Cook".to_string()),
            primary_goal: None,
            target_calories: None,
            target_protein: None,
            food_type: None,
            dietary_restrictions: None,
            allergies: None,
            preferred_cuisines: None,
            spice_level: None,
            cooking_time_preference: None,
            skill_level: None,
            household_size: None,
            budget_per_meal_min: None,
            budget_per_meal_max: None,
            city: None,
            state: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Apply an update the way the repository's `COALESCE` update does
    fn apply(profile: &UserProfile, update: &ProfileUpdate) -> UserProfile {
        let mut next = profile.clone();
        if let Some(v) = &update.dietary_restrictions {
            next.dietary_restrictions = Some(v.clone());
        }
        if let Some(v) = &update.preferred_cuisines {
            next.preferred_cuisines = Some(v.clone());
        }
        if let Some(v) = &update.cooking_time_preference {
            next.cooking_time_preference = Some(v.clone());
        }
        if let Some(v) = update.skill_level {
            next.skill_level = Some(v);
        }
        if let Some(v) = update.target_calories {
            next.target_calories = Some(v);
        }
        next
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_cooking_time_ceiling_table() {
        assert_eq!(cooking_time_ceiling(Some("quick")), 30);
        assert_eq!(cooking_time_ceiling(Some("medium")), 60);
        assert_eq!(cooking_time_ceiling(Some("long")), 120);
        assert_eq!(cooking_time_ceiling(Some("variable")), 120);
        assert_eq!(cooking_time_ceiling(Some("elaborate")), 120);
        assert_eq!(cooking_time_ceiling(None), 60);
    }

    #[test]
    fn test_skill_label_table() {
        assert_eq!(CookingSkill::from_level(Some(1)), CookingSkill::Beginner);
        assert_eq!(CookingSkill::from_level(Some(2)), CookingSkill::Intermediate);
        for level in 3..=5 {
            assert_eq!(CookingSkill::from_level(Some(level)), CookingSkill::Advanced);
        }
        assert_eq!(CookingSkill::from_level(None), CookingSkill::Intermediate);
    }

    #[test]
    fn test_bucket_for_ceiling() {
        assert_eq!(cooking_time_bucket(15), "quick");
        assert_eq!(cooking_time_bucket(30), "quick");
        assert_eq!(cooking_time_bucket(45), "medium");
        assert_eq!(cooking_time_bucket(60), "medium");
        assert_eq!(cooking_time_bucket(90), "long");
    }

    #[test]
    fn test_empty_profile_gets_defaults() {
        let preferences = UserPreferences::from_profile(&empty_profile());

        assert_eq!(preferences.dietary_restrictions, DietaryFlags::default());
        assert!(preferences.favorite_categories.is_empty());
        assert_eq!(preferences.cooking_skill_level, CookingSkill::Intermediate);
        assert_eq!(preferences.preferred_cooking_time, 60);
        assert_eq!(preferences.calorie_preference, None);
    }

    #[test]
    fn test_flags_from_restrictions() {
        let mut profile = empty_profile();
        profile.dietary_restrictions = Some(tags(&["vegan", "gluten-free", "nut-free"]));

        let flags = UserPreferences::from_profile(&profile).dietary_restrictions;
        assert!(flags.vegan);
        assert!(flags.gluten_free);
        assert!(!flags.vegetarian);
        assert!(!flags.dairy_free);
    }

    #[test]
    fn test_calorie_window() {
        let range = CalorieRange::around(2000);
        assert_eq!(range, CalorieRange { min: 1600, max: 2400 });
        assert_eq!(range.target(), 2000);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let mut profiles = vec![empty_profile()];

        let mut full = empty_profile();
        full.dietary_restrictions = Some(tags(&["vegetarian", "dairy-free", "nut-free"]));
        full.preferred_cuisines = Some(tags(&["italian", "thai"]));
        full.cooking_time_preference = Some("variable".to_string());
        full.skill_level = Some(5);
        full.target_calories = Some(1850);
        profiles.push(full);

        let mut quick = empty_profile();
        quick.cooking_time_preference = Some("quick".to_string());
        quick.skill_level = Some(1);
        profiles.push(quick);

        for profile in profiles {
            let normalized = UserPreferences::from_profile(&profile);
            let update = PreferenceUpdate::from(&normalized).to_profile_update(&profile);
            let renormalized = UserPreferences::from_profile(&apply(&profile, &update));

            assert_eq!(renormalized, normalized);
        }
    }

    #[test]
    fn test_update_keeps_unknown_restrictions() {
        let mut profile = empty_profile();
        profile.dietary_restrictions = Some(tags(&["vegetarian", "nut-free"]));

        let update = PreferenceUpdate {
            dietary_restrictions: Some(DietaryFlags {
                vegan: true,
                ..Default::default()
            }),
            ..Default::default()
        }
        .to_profile_update(&profile);

        assert_eq!(update.dietary_restrictions, Some(tags(&["nut-free", "vegan"])));
        assert_eq!(update.cooking_time_preference, None);
        assert_eq!(update.skill_level, None);
    }

    #[test]
    fn test_update_validation() {
        let bad_time = PreferenceUpdate {
            preferred_cooking_time: Some(0),
            ..Default::default()
        };
        assert!(bad_time.validate().is_err());

        let bad_range = PreferenceUpdate {
            calorie_preference: Some(CalorieRange { min: 2000, max: 1500 }),
            ..Default::default()
        };
        assert!(bad_range.validate().is_err());

        assert!(PreferenceUpdate::default().validate().is_ok());
    }
}
