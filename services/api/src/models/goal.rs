//! Goals and the dashboard counters derived from them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Completed goals needed per achievement
pub const GOALS_PER_ACHIEVEMENT: usize = 5;

const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "not_started",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(GoalStatus::NotStarted),
            "in_progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(format!("Unknown goal status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: GoalStatus,
    pub due_date: Option<NaiveDate>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Goal title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Goal title must be at most {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    Ok(())
}

/// Request for goal creation
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<GoalStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewGoal {
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)
    }
}

/// Request for goal edits; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoal {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<GoalStatus>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl UpdateGoal {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err("Goal category cannot be blank".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub in_progress_goals: usize,
    pub achievements: usize,
}

impl DashboardStats {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = GoalStatus>,
    {
        let mut stats = DashboardStats::default();
        for status in statuses {
            stats.total_goals += 1;
            match status {
                GoalStatus::Completed => stats.completed_goals += 1,
                GoalStatus::InProgress => stats.in_progress_goals += 1,
                GoalStatus::NotStarted => {}
            }
        }
        stats.achievements = stats.completed_goals / GOALS_PER_ACHIEVEMENT;
        stats
    }

    pub fn from_goals(goals: &[Goal]) -> Self {
        Self::from_statuses(goals.iter().map(|g| g.status))
    }
}
