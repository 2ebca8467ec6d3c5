//! Onboarding wizard
//!
//! Five fixed steps collect the preference profile. Each step carries its
//! own input shape ([`StepInput`]); Next only advances when the current
//! step's required field is filled, and Next on the review step hands back
//! the assembled [`ProfileUpdate`] for submission. Drafts live in the cache
//! store between requests.

use common::{cache::CacheBackend, error::CacheResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::profile::{
    CookingTime, FoodType, PrimaryGoal, ProfileUpdate, cuisine_label, skill_label, spice_label,
};

pub const TOTAL_STEPS: u8 = 5;

pub const BUDGET_MIN_FLOOR: i32 = 30;
pub const BUDGET_MIN_CEILING: i32 = 500;
pub const BUDGET_MAX_CEILING: i32 = 1000;
pub const BUDGET_STEP: i32 = 10;

const MAX_LOCATION_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Goal,
    DietaryPreferences,
    CookingPreferences,
    LocationBudget,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Goal => 1,
            WizardStep::DietaryPreferences => 2,
            WizardStep::CookingPreferences => 3,
            WizardStep::LocationBudget => 4,
            WizardStep::Review => 5,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Goal => "What's your primary goal?",
            WizardStep::DietaryPreferences => "Dietary preferences",
            WizardStep::CookingPreferences => "Cooking preferences",
            WizardStep::LocationBudget => "Location & budget",
            WizardStep::Review => "Review your profile",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Goal => Some(WizardStep::DietaryPreferences),
            WizardStep::DietaryPreferences => Some(WizardStep::CookingPreferences),
            WizardStep::CookingPreferences => Some(WizardStep::LocationBudget),
            WizardStep::LocationBudget => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Goal => None,
            WizardStep::DietaryPreferences => Some(WizardStep::Goal),
            WizardStep::CookingPreferences => Some(WizardStep::DietaryPreferences),
            WizardStep::LocationBudget => Some(WizardStep::CookingPreferences),
            WizardStep::Review => Some(WizardStep::LocationBudget),
        }
    }
}

/// Slider position in 1..=5 (spice level, skill level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(3)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Level(value))
        } else {
            Err(format!("level must be between 1 and 5, got {}", value))
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Household size picked from 1..=5, where 5 stands for "5 or more"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HouseholdSize(u8);

impl HouseholdSize {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> String {
        if self.0 >= 5 {
            "5+".to_string()
        } else {
            self.0.to_string()
        }
    }
}

impl Default for HouseholdSize {
    fn default() -> Self {
        HouseholdSize(2)
    }
}

impl TryFrom<u8> for HouseholdSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(HouseholdSize(value))
        } else {
            Err(format!("household size must be between 1 and 5, got {}", value))
        }
    }
}

impl From<HouseholdSize> for u8 {
    fn from(size: HouseholdSize) -> Self {
        size.0
    }
}

#[derive(Deserialize)]
struct BudgetInput {
    min: i32,
    max: i32,
}

/// Per-meal budget; `min <= max` always holds
///
/// Setting the minimum clamps it into [30, 500] and pulls the maximum up
/// when needed. Setting the maximum clamps it into [min, 1000]. Both snap to
/// steps of 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BudgetInput")]
pub struct BudgetRange {
    min: i32,
    max: i32,
}

/// Round to the nearest step; callers clamp into range first
fn snap(value: i32) -> i32 {
    (value + BUDGET_STEP / 2).div_euclid(BUDGET_STEP) * BUDGET_STEP
}

impl BudgetRange {
    pub fn new(min: i32, max: i32) -> Self {
        let mut range = Self::default();
        range.set_min(min);
        range.set_max(max);
        range
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn set_min(&mut self, min: i32) {
        self.min = snap(min.clamp(BUDGET_MIN_FLOOR, BUDGET_MIN_CEILING));
        if self.max < self.min {
            self.max = self.min;
        }
    }

    pub fn set_max(&mut self, max: i32) {
        self.max = snap(max.clamp(self.min, BUDGET_MAX_CEILING));
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self { min: 50, max: 200 }
    }
}

impl From<BudgetInput> for BudgetRange {
    fn from(input: BudgetInput) -> Self {
        BudgetRange::new(input.min, input.max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalInput {
    pub primary_goal: Option<PrimaryGoal>,
    pub target_calories: Option<i32>,
    pub target_protein: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryInput {
    pub food_type: Option<FoodType>,
    pub dietary_restrictions: Vec<String>,
    pub allergies: Vec<String>,
    pub preferred_cuisines: Vec<String>,
    pub spice_level: Level,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookingInput {
    pub cooking_time_preference: Option<CookingTime>,
    pub skill_level: Level,
    pub household_size: HouseholdSize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationBudgetInput {
    pub city: String,
    pub state: String,
    pub budget: BudgetRange,
}

/// Input for one wizard step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", content = "input", rename_all = "snake_case")]
pub enum StepInput {
    Goal(GoalInput),
    DietaryPreferences(DietaryInput),
    CookingPreferences(CookingInput),
    LocationBudget(LocationBudgetInput),
}

impl StepInput {
    pub fn step(&self) -> WizardStep {
        match self {
            StepInput::Goal(_) => WizardStep::Goal,
            StepInput::DietaryPreferences(_) => WizardStep::DietaryPreferences,
            StepInput::CookingPreferences(_) => WizardStep::CookingPreferences,
            StepInput::LocationBudget(_) => WizardStep::LocationBudget,
        }
    }

    fn validate(&self) -> Result<(), WizardError> {
        let invalid = |msg: &str| Err(WizardError::InvalidInput(msg.to_string()));

        match self {
            StepInput::Goal(input) => {
                if input.target_calories.is_some_and(|c| c <= 0) {
                    return invalid("Target calories must be positive");
                }
                if input.target_protein.is_some_and(|p| p <= 0) {
                    return invalid("Target protein must be positive");
                }
            }
            StepInput::DietaryPreferences(input) => {
                let lists = [
                    &input.dietary_restrictions,
                    &input.allergies,
                    &input.preferred_cuisines,
                ];
                if lists.iter().any(|l| l.iter().any(|v| v.trim().is_empty())) {
                    return invalid("List entries cannot be blank");
                }
            }
            StepInput::CookingPreferences(_) => {}
            StepInput::LocationBudget(input) => {
                if input.city.chars().count() > MAX_LOCATION_LENGTH
                    || input.state.chars().count() > MAX_LOCATION_LENGTH
                {
                    return invalid("City and state must be at most 100 characters");
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("Step {} is incomplete", .0.number())]
    StepIncomplete(WizardStep),

    #[error("Already on the first step")]
    AtFirstStep,

    #[error("Input is for step {}, but the wizard is on step {}", .got.number(), .expected.number())]
    WrongStep {
        expected: WizardStep,
        got: WizardStep,
    },

    #[error("{0}")]
    InvalidInput(String),
}

/// Outcome of pressing Next
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Advanced(WizardStep),
    /// The review step was confirmed; persist this record
    Submit(ProfileUpdate),
}

/// Wizard draft: current step plus the input collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingWizard {
    step: WizardStep,
    goal: GoalInput,
    dietary: DietaryInput,
    cooking: CookingInput,
    location_budget: LocationBudgetInput,
}

impl OnboardingWizard {
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Whether `step`'s required field is filled
    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Goal => self.goal.primary_goal.is_some(),
            WizardStep::DietaryPreferences => self.dietary.food_type.is_some(),
            WizardStep::CookingPreferences => self.cooking.cooking_time_preference.is_some(),
            WizardStep::LocationBudget => !self.location_budget.city.trim().is_empty(),
            WizardStep::Review => true,
        }
    }

    pub fn can_next(&self) -> bool {
        self.is_step_valid(self.step)
    }

    pub fn can_previous(&self) -> bool {
        self.step.previous().is_some()
    }

    /// Replace the input of the current step
    pub fn update(&mut self, input: StepInput) -> Result<(), WizardError> {
        if input.step() != self.step {
            return Err(WizardError::WrongStep {
                expected: self.step,
                got: input.step(),
            });
        }
        input.validate()?;

        match input {
            StepInput::Goal(goal) => self.goal = goal,
            StepInput::DietaryPreferences(dietary) => self.dietary = dietary,
            StepInput::CookingPreferences(cooking) => self.cooking = cooking,
            StepInput::LocationBudget(location_budget) => self.location_budget = location_budget,
        }

        Ok(())
    }

    pub fn next(&mut self) -> Result<Transition, WizardError> {
        if !self.can_next() {
            return Err(WizardError::StepIncomplete(self.step));
        }

        match self.step.next() {
            Some(step) => {
                debug!("Wizard advanced to step {}", step.number());
                self.step = step;
                Ok(Transition::Advanced(step))
            }
            None => Ok(Transition::Submit(self.profile_update())),
        }
    }

    pub fn previous(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = step;
        Ok(step)
    }

    /// The full preference record assembled from every step
    pub fn profile_update(&self) -> ProfileUpdate {
        let budget = self.location_budget.budget;

        ProfileUpdate {
            primary_goal: self.goal.primary_goal.map(|g| g.as_str().to_string()),
            target_calories: self.goal.target_calories,
            target_protein: self.goal.target_protein,
            food_type: self.dietary.food_type.map(|f| f.as_str().to_string()),
            dietary_restrictions: Some(self.dietary.dietary_restrictions.clone()),
            allergies: Some(self.dietary.allergies.clone()),
            preferred_cuisines: Some(self.dietary.preferred_cuisines.clone()),
            spice_level: Some(i32::from(self.dietary.spice_level.value())),
            cooking_time_preference: self
                .cooking
                .cooking_time_preference
                .map(|t| t.as_str().to_string()),
            skill_level: Some(i32::from(self.cooking.skill_level.value())),
            household_size: Some(i32::from(self.cooking.household_size.value())),
            budget_per_meal_min: Some(budget.min()),
            budget_per_meal_max: Some(budget.max()),
            city: Some(self.location_budget.city.trim().to_string()),
            state: Some(self.location_budget.state.trim().to_string()),
        }
    }

    pub fn review(&self) -> ReviewSummary {
        ReviewSummary {
            primary_goal: self.goal.primary_goal.map(|g| g.label()),
            food_type: self.dietary.food_type.map(|f| f.label()),
            cuisines: self
                .dietary
                .preferred_cuisines
                .iter()
                .map(|c| cuisine_label(c).to_string())
                .collect(),
            spice_level: spice_label(self.dietary.spice_level.value()),
            cooking_time: self.cooking.cooking_time_preference.map(|t| t.label()),
            skill_level: skill_label(self.cooking.skill_level.value()),
            household_size: self.cooking.household_size.label(),
            budget: self.location_budget.budget,
            city: self.location_budget.city.trim().to_string(),
            state: self.location_budget.state.trim().to_string(),
        }
    }

    /// Percentage of the wizard reached, 20 on the first step and 100 on review
    pub fn progress(&self) -> u8 {
        let percent = u16::from(self.step.number()) * 100 / u16::from(TOTAL_STEPS);
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            step: self.step,
            step_number: self.step.number(),
            total_steps: TOTAL_STEPS,
            title: self.step.title(),
            progress: self.progress(),
            can_next: self.can_next(),
            can_previous: self.can_previous(),
            review: (self.step == WizardStep::Review).then(|| self.review()),
            draft: self.clone(),
        }
    }
}

/// Human-readable labels shown on the review step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub primary_goal: Option<&'static str>,
    pub food_type: Option<&'static str>,
    pub cuisines: Vec<String>,
    pub spice_level: &'static str,
    pub cooking_time: Option<&'static str>,
    pub skill_level: &'static str,
    pub household_size: String,
    pub budget: BudgetRange,
    pub city: String,
    pub state: String,
}

/// Wizard state as returned to the client
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub title: &'static str,
    /// Percent complete
    pub progress: u8,
    pub can_next: bool,
    pub can_previous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewSummary>,
    pub draft: OnboardingWizard,
}

fn draft_key(user_id: Uuid) -> String {
    format!("onboarding:{}", user_id)
}

/// Per-user wizard drafts kept in the cache store
#[derive(Clone)]
pub struct DraftStore {
    cache: CacheBackend,
    ttl_seconds: u64,
}

impl DraftStore {
    pub fn new(cache: CacheBackend, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }

    /// The user's draft, or a fresh wizard on step 1
    pub async fn load(&self, user_id: Uuid) -> CacheResult<OnboardingWizard> {
        Ok(self
            .cache
            .get_json(&draft_key(user_id))
            .await?
            .unwrap_or_default())
    }

    pub async fn save(&self, user_id: Uuid, wizard: &OnboardingWizard) -> CacheResult<()> {
        self.cache
            .set_json(&draft_key(user_id), wizard, Some(self.ttl_seconds))
            .await
    }

    pub async fn discard(&self, user_id: Uuid) -> CacheResult<()> {
        self.cache.delete(&draft_key(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::cache::MemoryCache;

    fn goal_input(primary_goal: Option<PrimaryGoal>) -> StepInput {
        StepInput::Goal(GoalInput {
            primary_goal,
            ..Default::default()
        })
    }

    /// Fill every step with valid input and stop on the review step
    fn completed_wizard() -> OnboardingWizard {
        let mut wizard = OnboardingWizard::default();

        wizard
            .update(goal_input(Some(PrimaryGoal::HealthyLiving)))
            .unwrap();
        wizard.next().unwrap();

        wizard
            .update(StepInput::DietaryPreferences(DietaryInput {
                food_type: Some(FoodType::Vegetarian),
                preferred_cuisines: vec!["south_indian".to_string()],
                ..Default::default()
            }))
            .unwrap();
        wizard.next().unwrap();

        wizard
            .update(StepInput::CookingPreferences(CookingInput {
                cooking_time_preference: Some(CookingTime::Quick),
                household_size: HouseholdSize::try_from(5).unwrap(),
                ..Default::default()
            }))
            .unwrap();
        wizard.next().unwrap();

        wizard
            .update(StepInput::LocationBudget(LocationBudgetInput {
                city: " Chennai ".to_string(),
                state: "Tamil Nadu".to_string(),
                budget: BudgetRange::new(100, 300),
            }))
            .unwrap();
        wizard.next().unwrap();

        wizard
    }

    #[test]
    fn test_next_disabled_until_required_field_set() {
        let mut wizard = OnboardingWizard::default();
        assert!(!wizard.can_next());
        assert_eq!(
            wizard.next(),
            Err(WizardError::StepIncomplete(WizardStep::Goal))
        );
        assert_eq!(wizard.step(), WizardStep::Goal);

        wizard
            .update(goal_input(Some(PrimaryGoal::WeightLoss)))
            .unwrap();
        assert!(wizard.can_next());
        assert_eq!(
            wizard.next(),
            Ok(Transition::Advanced(WizardStep::DietaryPreferences))
        );
    }

    #[test]
    fn test_each_step_predicate() {
        let mut wizard = OnboardingWizard::default();
        wizard
            .update(goal_input(Some(PrimaryGoal::QuickMeals)))
            .unwrap();
        wizard.next().unwrap();

        assert!(!wizard.can_next());
        wizard
            .update(StepInput::DietaryPreferences(DietaryInput {
                food_type: Some(FoodType::Vegan),
                ..Default::default()
            }))
            .unwrap();
        assert!(wizard.can_next());
        wizard.next().unwrap();

        assert!(!wizard.can_next());
        wizard
            .update(StepInput::CookingPreferences(CookingInput {
                cooking_time_preference: Some(CookingTime::Variable),
                ..Default::default()
            }))
            .unwrap();
        assert!(wizard.can_next());
        wizard.next().unwrap();

        assert!(!wizard.can_next());
        wizard
            .update(StepInput::LocationBudget(LocationBudgetInput {
                city: "   ".to_string(),
                ..Default::default()
            }))
            .unwrap();
        assert!(!wizard.can_next());
        wizard
            .update(StepInput::LocationBudget(LocationBudgetInput {
                city: "Pune".to_string(),
                ..Default::default()
            }))
            .unwrap();
        assert!(wizard.can_next());
        wizard.next().unwrap();

        assert_eq!(wizard.step(), WizardStep::Review);
        assert!(wizard.can_next());
    }

    #[test]
    fn test_previous_disabled_only_on_first_step() {
        let mut wizard = completed_wizard();
        assert_eq!(wizard.step(), WizardStep::Review);

        for expected in [
            WizardStep::LocationBudget,
            WizardStep::CookingPreferences,
            WizardStep::DietaryPreferences,
            WizardStep::Goal,
        ] {
            assert!(wizard.can_previous());
            assert_eq!(wizard.previous(), Ok(expected));
        }

        assert!(!wizard.can_previous());
        assert_eq!(wizard.previous(), Err(WizardError::AtFirstStep));
    }

    #[test]
    fn test_previous_ignores_step_validity() {
        let mut wizard = OnboardingWizard::default();
        wizard
            .update(goal_input(Some(PrimaryGoal::FamilyCooking)))
            .unwrap();
        wizard.next().unwrap();

        assert!(!wizard.can_next());
        assert_eq!(wizard.previous(), Ok(WizardStep::Goal));
    }

    #[test]
    fn test_next_on_review_submits_without_advancing() {
        let mut wizard = completed_wizard();

        let Ok(Transition::Submit(update)) = wizard.next() else {
            panic!("expected submission");
        };
        assert_eq!(wizard.step(), WizardStep::Review);

        assert_eq!(update.primary_goal.as_deref(), Some("healthy_living"));
        assert_eq!(update.food_type.as_deref(), Some("vegetarian"));
        assert_eq!(update.cooking_time_preference.as_deref(), Some("quick"));
        assert_eq!(update.spice_level, Some(3));
        assert_eq!(update.skill_level, Some(3));
        assert_eq!(update.household_size, Some(5));
        assert_eq!(update.budget_per_meal_min, Some(100));
        assert_eq!(update.budget_per_meal_max, Some(300));
        assert_eq!(update.city.as_deref(), Some("Chennai"));
        assert_eq!(update.target_calories, None);
    }

    #[test]
    fn test_input_for_other_step_is_rejected() {
        let mut wizard = OnboardingWizard::default();
        let result = wizard.update(StepInput::LocationBudget(LocationBudgetInput {
            city: "Pune".to_string(),
            ..Default::default()
        }));

        assert_eq!(
            result,
            Err(WizardError::WrongStep {
                expected: WizardStep::Goal,
                got: WizardStep::LocationBudget,
            })
        );
    }

    #[test]
    fn test_household_size_labels() {
        let five = HouseholdSize::try_from(5).unwrap();
        assert_eq!(five.value(), 5);
        assert_eq!(five.label(), "5+");

        let two = HouseholdSize::try_from(2).unwrap();
        assert_eq!(two.value(), 2);
        assert_eq!(two.label(), "2");

        assert!(HouseholdSize::try_from(0).is_err());
        assert!(HouseholdSize::try_from(6).is_err());
    }

    #[test]
    fn test_household_size_from_json() {
        let input: StepInput = serde_json::from_value(serde_json::json!({
            "step": "cooking_preferences",
            "input": { "cooking_time_preference": "medium", "household_size": 5 }
        }))
        .unwrap();

        let StepInput::CookingPreferences(cooking) = input else {
            panic!("wrong step");
        };
        assert_eq!(cooking.household_size.label(), "5+");
        assert_eq!(cooking.skill_level.value(), 3);

        let out_of_range = serde_json::from_value::<StepInput>(serde_json::json!({
            "step": "cooking_preferences",
            "input": { "household_size": 9 }
        }));
        assert!(out_of_range.is_err());
    }

    #[test]
    fn test_budget_min_above_max_pushes_max_up() {
        let mut budget = BudgetRange::default();
        assert_eq!((budget.min(), budget.max()), (50, 200));

        budget.set_min(350);
        assert_eq!((budget.min(), budget.max()), (350, 350));

        budget.set_max(100);
        assert_eq!((budget.min(), budget.max()), (350, 350));

        budget.set_max(2000);
        assert_eq!(budget.max(), 1000);
    }

    #[test]
    fn test_budget_bounds_and_step() {
        let mut budget = BudgetRange::default();

        budget.set_min(5);
        assert_eq!(budget.min(), 30);

        budget.set_min(900);
        assert_eq!(budget.min(), 500);
        assert_eq!(budget.max(), 500);

        budget.set_min(44);
        assert_eq!(budget.min(), 40);
        budget.set_max(455);
        assert_eq!(budget.max(), 460);

        let parsed: BudgetRange =
            serde_json::from_value(serde_json::json!({ "min": 400, "max": 100 })).unwrap();
        assert!(parsed.min() <= parsed.max());
        assert_eq!((parsed.min(), parsed.max()), (400, 400));
    }

    #[test]
    fn test_review_summary_labels() {
        let review = completed_wizard().review();

        assert_eq!(review.primary_goal, Some("Healthy Living"));
        assert_eq!(review.food_type, Some("Vegetarian"));
        assert_eq!(review.cuisines, vec!["South Indian".to_string()]);
        assert_eq!(review.spice_level, "Medium");
        assert_eq!(review.cooking_time, Some("Quick (15-30 min)"));
        assert_eq!(review.skill_level, "Intermediate");
        assert_eq!(review.household_size, "5+");
    }

    #[test]
    fn test_view_progress() {
        let view = OnboardingWizard::default().view();
        assert_eq!(view.step_number, 1);
        assert_eq!(view.progress, 20);
        assert!(!view.can_previous);
        assert!(view.review.is_none());

        let view = completed_wizard().view();
        assert_eq!(view.progress, 100);
        assert!(view.review.is_some());
    }

    #[test]
    fn test_progress_on_every_step() {
        let mut wizard = completed_wizard();
        let mut seen = vec![wizard.view().progress];
        while wizard.previous().is_ok() {
            seen.push(wizard.view().progress);
        }

        assert_eq!(seen, vec![100, 80, 60, 40, 20]);
    }

    #[test]
    fn test_budget_extreme_values_are_clamped() {
        for (min, max) in [
            (i32::MAX, i32::MAX),
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MIN),
            (i32::MIN, i32::MAX),
        ] {
            let budget = BudgetRange::new(min, max);
            assert!((BUDGET_MIN_FLOOR..=BUDGET_MIN_CEILING).contains(&budget.min()));
            assert!((budget.min()..=BUDGET_MAX_CEILING).contains(&budget.max()));
            assert_eq!(budget.min() % BUDGET_STEP, 0);
            assert_eq!(budget.max() % BUDGET_STEP, 0);
        }

        assert_eq!(
            BudgetRange::new(i32::MAX, i32::MAX),
            BudgetRange::new(500, 1000)
        );
        assert_eq!(BudgetRange::new(i32::MIN, i32::MIN), BudgetRange::new(30, 30));

        let input: StepInput = serde_json::from_value(serde_json::json!({
            "step": "location_budget",
            "input": { "city": "Pune", "budget": { "min": i32::MAX, "max": 100 } }
        }))
        .unwrap();
        let StepInput::LocationBudget(location) = input else {
            panic!("wrong step");
        };
        assert_eq!((location.budget.min(), location.budget.max()), (500, 500));
    }

    #[tokio::test]
    async fn test_draft_store_lifecycle() {
        let store = DraftStore::new(CacheBackend::Memory(MemoryCache::new()), 86400);
        let user_id = Uuid::new_v4();

        assert_eq!(
            store.load(user_id).await.unwrap(),
            OnboardingWizard::default()
        );

        let wizard = completed_wizard();
        store.save(user_id, &wizard).await.unwrap();
        assert_eq!(store.load(user_id).await.unwrap(), wizard);

        store.discard(user_id).await.unwrap();
        assert_eq!(store.load(user_id).await.unwrap().step(), WizardStep::Goal);
    }
}
