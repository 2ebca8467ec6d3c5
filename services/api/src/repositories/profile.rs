//! Preference profile repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{ProfileUpdate, UserProfile};

const PROFILE_COLUMNS: &str = "id, email, full_name, primary_goal, target_calories, \
    target_protein, food_type, dietary_restrictions, allergies, preferred_cuisines, \
    spice_level, cooking_time_preference, skill_level, household_size, \
    budget_per_meal_min, budget_per_meal_max, city, state, created_at, updated_at";

fn profile_from_row(row: &PgRow) -> UserProfile {
    UserProfile {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        primary_goal: row.get("primary_goal"),
        target_calories: row.get("target_calories"),
        target_protein: row.get("target_protein"),
        food_type: row.get("food_type"),
        dietary_restrictions: row.get("dietary_restrictions"),
        allergies: row.get("allergies"),
        preferred_cuisines: row.get("preferred_cuisines"),
        spice_level: row.get("spice_level"),
        cooking_time_preference: row.get("cooking_time_preference"),
        skill_level: row.get("skill_level"),
        household_size: row.get("household_size"),
        budget_per_meal_min: row.get("budget_per_meal_min"),
        budget_per_meal_max: row.get("budget_per_meal_max"),
        city: row.get("city"),
        state: row.get("state"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Reads and updates `user_profiles`
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the profile of a user
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM user_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Write the set fields of `update` in one statement and return the
    /// stored profile; `None` when the user has no profile row
    pub async fn update(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserProfile>> {
        info!("Updating preference profile for user: {}", user_id);
        self.write(user_id, update, WriteMode::Merge).await
    }

    /// Overwrite every preference column with `profile`; unset fields
    /// become NULL
    pub async fn replace(
        &self,
        user_id: Uuid,
        profile: &ProfileUpdate,
    ) -> Result<Option<UserProfile>> {
        info!("Replacing preference profile for user: {}", user_id);
        self.write(user_id, profile, WriteMode::Replace).await
    }

    async fn write(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
        mode: WriteMode,
    ) -> Result<Option<UserProfile>> {
        let row = sqlx::query(&format!(
            "UPDATE user_profiles SET {}, updated_at = now() WHERE id = $1 RETURNING {}",
            set_clause(mode),
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(&update.primary_goal)
        .bind(update.target_calories)
        .bind(update.target_protein)
        .bind(&update.food_type)
        .bind(&update.dietary_restrictions)
        .bind(&update.allergies)
        .bind(&update.preferred_cuisines)
        .bind(update.spice_level)
        .bind(&update.cooking_time_preference)
        .bind(update.skill_level)
        .bind(update.household_size)
        .bind(update.budget_per_meal_min)
        .bind(update.budget_per_meal_max)
        .bind(&update.city)
        .bind(&update.state)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    /// Keep the stored value where the update has none
    Merge,
    Replace,
}

/// Preference columns in bind order, starting at `$2`
const WRITABLE_COLUMNS: [&str; 15] = [
    "primary_goal",
    "target_calories",
    "target_protein",
    "food_type",
    "dietary_restrictions",
    "allergies",
    "preferred_cuisines",
    "spice_level",
    "cooking_time_preference",
    "skill_level",
    "household_size",
    "budget_per_meal_min",
    "budget_per_meal_max",
    "city",
    "state",
];

fn set_clause(mode: WriteMode) -> String {
    WRITABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let param = i + 2;
            match mode {
                WriteMode::Merge => format!("{column} = COALESCE(${param}, {column})"),
                WriteMode::Replace => format!("{column} = ${param}"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_stored_values() {
        let clause = set_clause(WriteMode::Merge);

        assert!(clause.starts_with("primary_goal = COALESCE($2, primary_goal)"));
        assert!(clause.contains("target_calories = COALESCE($3, target_calories)"));
        assert!(clause.ends_with("state = COALESCE($16, state)"));
    }

    #[test]
    fn test_replace_overwrites_every_column() {
        let clause = set_clause(WriteMode::Replace);

        assert!(!clause.contains("COALESCE"));
        assert!(clause.contains("target_calories = $3"));
        assert!(clause.contains("target_protein = $4"));
        assert_eq!(clause.matches('$').count(), WRITABLE_COLUMNS.len());
        assert!(clause.ends_with("state = $16"));
    }
}
