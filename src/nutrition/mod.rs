//! Nutrition calculation module
//!
//! Target calculation and daily progress. Both are pure functions.

pub mod progress;
pub mod targets;

pub use progress::{
    daily_progress, progress_percent, ConsumedTotals, DailyProgress, GoalValues, GoalsSource,
    MealMacros, DEFAULT_CALORIE_GOAL,
};
pub use targets::{
    bmr, compute, compute_breakdown, round_half_up, tdee, ActivityLevel, FitnessGoal, GoalPlan,
    NutritionTargets, Profile, Sex, TargetBreakdown,
};
