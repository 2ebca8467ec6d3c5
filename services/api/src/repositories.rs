//! Repositories for database operations

pub mod goal;
pub mod profile;
pub mod recipe;

pub use goal::GoalRepository;
pub use profile::ProfileRepository;
pub use recipe::RecipeRepository;
