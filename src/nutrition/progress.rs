//! Daily progress against goals
//!
//! Sums what was eaten on a day and compares it with the daily goals.

use serde::{Deserialize, Serialize};

/// Calorie goal used when the user has none stored
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// A consumed meal as reported by the caller. Missing macros count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealMacros {
    #[serde(default)]
    pub name: Option<String>,
    pub calories: f64,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
}

/// Summed intake for a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumedTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl ConsumedTotals {
    pub fn from_meals(meals: &[MealMacros]) -> Self {
        meals.iter().fold(Self::default(), |acc, meal| Self {
            calories: acc.calories + meal.calories,
            protein: acc.protein + meal.protein.unwrap_or(0.0),
            carbs: acc.carbs + meal.carbs.unwrap_or(0.0),
            fats: acc.fats + meal.fats.unwrap_or(0.0),
        })
    }
}

/// Goal values the progress is measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalValues {
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

impl Default for GoalValues {
    fn default() -> Self {
        Self {
            calories: DEFAULT_CALORIE_GOAL,
            protein: None,
            carbs: None,
            fats: None,
        }
    }
}

/// Where the goal values came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalsSource {
    Calculated,
    Manual,
    /// Nothing stored; `DEFAULT_CALORIE_GOAL` applies
    Default,
}

/// Progress for one day
#[derive(Debug, Clone, Serialize)]
pub struct DailyProgress {
    pub date: String,
    pub meal_count: usize,
    pub consumed: ConsumedTotals,
    pub goals: GoalValues,
    pub goals_source: GoalsSource,
    pub calorie_progress_percent: f64,
    pub calories_remaining: f64,
    pub protein_progress_percent: Option<f64>,
    pub carbs_progress_percent: Option<f64>,
    pub fats_progress_percent: Option<f64>,
}

/// Percentage of `goal` reached, capped at 100.
///
/// A non-positive goal counts as reached as soon as anything is consumed.
pub fn progress_percent(consumed: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return if consumed > 0.0 { 100.0 } else { 0.0 };
    }
    (consumed / goal * 100.0).min(100.0)
}

/// Compute progress for a day's meals against the given goals
pub fn daily_progress(
    date: &str,
    meals: &[MealMacros],
    goals: GoalValues,
    goals_source: GoalsSource,
) -> DailyProgress {
    let consumed = ConsumedTotals::from_meals(meals);

    DailyProgress {
        date: date.to_string(),
        meal_count: meals.len(),
        consumed,
        goals,
        goals_source,
        calorie_progress_percent: progress_percent(consumed.calories, goals.calories),
        calories_remaining: (goals.calories - consumed.calories).max(0.0),
        protein_progress_percent: goals.protein.map(|g| progress_percent(consumed.protein, g)),
        carbs_progress_percent: goals.carbs.map(|g| progress_percent(consumed.carbs, g)),
        fats_progress_percent: goals.fats.map(|g| progress_percent(consumed.fats, g)),
    }
}
