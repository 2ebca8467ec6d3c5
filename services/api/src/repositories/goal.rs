//! Goal repository

use anyhow::{Result, anyhow};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Goal, GoalStatus, NewGoal, UpdateGoal};

const DEFAULT_CATEGORY: &str = "general";

fn goal_from_row(row: &PgRow) -> Result<Goal> {
    let status: String = row.get("status");

    Ok(Goal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: status.parse::<GoalStatus>().map_err(|e| anyhow!(e))?,
        due_date: row.get("due_date"),
        category: row.get("category"),
        created_at: row.get("created_at"),
    })
}

/// Goals owned by a user; every query is scoped to the owner
#[derive(Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All goals of a user, newest first
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, description, status, due_date, category, created_at
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(goal_from_row).collect()
    }

    /// Statuses of a user's goals, for the dashboard counters
    pub async fn statuses(&self, user_id: Uuid) -> Result<Vec<GoalStatus>> {
        let rows = sqlx::query("SELECT status FROM goals WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let status: String = row.get("status");
                status.parse::<GoalStatus>().map_err(|e| anyhow!(e))
            })
            .collect()
    }

    pub async fn create(&self, user_id: Uuid, new_goal: &NewGoal) -> Result<Goal> {
        info!("Creating goal for user: {}", user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO goals (user_id, title, description, status, due_date, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, status, due_date, category, created_at
            "#,
        )
        .bind(user_id)
        .bind(new_goal.title.trim())
        .bind(new_goal.description.as_deref().unwrap_or_default())
        .bind(new_goal.status.unwrap_or_default().as_str())
        .bind(new_goal.due_date)
        .bind(
            new_goal
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORY),
        )
        .fetch_one(&self.pool)
        .await?;

        goal_from_row(&row)
    }

    /// Apply an edit; `None` when the goal does not exist or belongs to
    /// someone else
    pub async fn update(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        update: &UpdateGoal,
    ) -> Result<Option<Goal>> {
        info!("Updating goal {} for user: {}", goal_id, user_id);

        let row = sqlx::query(
            r#"
            UPDATE goals SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                due_date = COALESCE($6, due_date),
                category = COALESCE($7, category)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, due_date, category, created_at
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(update.title.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.due_date)
        .bind(update.category.as_deref().map(str::trim))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(goal_from_row).transpose()
    }

    /// Returns whether a goal was deleted
    pub async fn delete(&self, user_id: Uuid, goal_id: Uuid) -> Result<bool> {
        info!("Deleting goal {} for user: {}", goal_id, user_id);

        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(goal_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
