//! Recipe catalog repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::debug;

use crate::models::{RecipeQuery, RecipeRow};

fn recipe_from_row(row: &PgRow) -> RecipeRow {
    RecipeRow {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        image_url: row.get("image_url"),
        total_time_minutes: row.get("total_time_minutes"),
        prep_time_minutes: row.get("prep_time_minutes"),
        cook_time_minutes: row.get("cook_time_minutes"),
        difficulty_level: row.get("difficulty_level"),
        calories_per_serving: row.get("calories_per_serving"),
        protein_per_serving: row.get("protein_per_serving"),
        carbs_per_serving: row.get("carbs_per_serving"),
        fat_per_serving: row.get("fat_per_serving"),
        servings: row.get("servings"),
        cuisine_type: row.get("cuisine_type"),
        dietary_tags: row.get("dietary_tags"),
        instructions: row.get("instructions"),
        created_at: row.get("created_at"),
        average_rating: row.get("average_rating"),
        review_count: row.get("review_count"),
    }
}

/// Read-only access to `recipes` and their review aggregates
#[derive(Clone)]
pub struct RecipeRepository {
    pool: PgPool,
}

impl RecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest recipes matching `query`
    pub async fn find(&self, query: &RecipeQuery) -> Result<Vec<RecipeRow>> {
        debug!("Fetching recipes: {:?}", query);

        let rows = sqlx::query(
            r#"
            SELECT r.id, r.name, r.description, r.image_url,
                   r.total_time_minutes, r.prep_time_minutes, r.cook_time_minutes,
                   r.difficulty_level, r.calories_per_serving, r.protein_per_serving,
                   r.carbs_per_serving, r.fat_per_serving, r.servings,
                   r.cuisine_type, r.dietary_tags, r.instructions, r.created_at,
                   AVG(rv.rating)::float8 AS average_rating,
                   COUNT(rv.rating) AS review_count
            FROM recipes r
            LEFT JOIN recipe_reviews rv ON rv.recipe_id = r.id
            WHERE ($1::int IS NULL OR r.total_time_minutes IS NULL OR r.total_time_minutes <= $1)
              AND (cardinality($2::text[]) = 0 OR r.cuisine_type = ANY($2))
              AND (cardinality($3::text[]) = 0 OR COALESCE(r.dietary_tags, '{}') @> $3)
            GROUP BY r.id
            ORDER BY r.created_at DESC
            LIMIT $4
            "#,
        )
        .bind(query.max_total_time)
        .bind(&query.cuisines)
        .bind(&query.required_tags)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(recipe_from_row).collect())
    }

    /// Recommendation feed: preference-filtered recipes, or the newest
    /// recipes when nothing matches
    pub async fn recommended(&self, query: &RecipeQuery) -> Result<Vec<RecipeRow>> {
        let rows = self.find(query).await?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        debug!("No recipe matches the preferences, falling back to newest");
        self.find(&RecipeQuery::newest()).await
    }
}
