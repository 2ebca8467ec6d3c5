//! API models for request and response payloads

pub mod goal;
pub mod preferences;
pub mod profile;
pub mod recipe;

pub use goal::{DashboardStats, Goal, GoalStatus, NewGoal, UpdateGoal};
pub use preferences::{PreferenceUpdate, UserPreferences};
pub use profile::{ProfileUpdate, UserProfile};
pub use recipe::{DisplayRecipe, RecipeQuery, RecipeRow};
